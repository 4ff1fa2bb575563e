//! # Order Scheduling (Phase B)
//!
//! Order dates target an arrival `safety_days` ahead of the group's first
//! demand, clamped into the cutoff window. A clamp that pushes the
//! arrival past the demand marks the batch critical and records the
//! delay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::PlanningParameters;
use mrp_core::calendar::{add_days, days_between};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Schedule {
    pub order_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub is_critical: bool,
    pub arrival_delay_days: Option<i64>,
}

/// Schedule the batch covering a group whose first demand falls on
/// `first_demand`. `safety_days` is passed explicitly because JIT orders
/// on the demand day itself.
pub fn schedule_group(
    first_demand: NaiveDate,
    params: &PlanningParameters,
    safety_days: i64,
) -> Schedule {
    let target_arrival = add_days(first_demand, -safety_days);
    let unclamped_order = add_days(target_arrival, -params.leadtime_days);
    let latest_order = add_days(params.end_cutoff, -params.leadtime_days);

    let order_date = unclamped_order.max(params.start_cutoff).min(latest_order);
    let arrival_date = add_days(order_date, params.leadtime_days);

    let is_critical = arrival_date > first_demand;
    let arrival_delay_days = if is_critical {
        let delay = days_between(first_demand, arrival_date);
        warn!(
            %first_demand,
            %arrival_date,
            delay_days = delay,
            "cutoff clamp delays arrival past its demand"
        );
        Some(delay)
    } else {
        None
    };

    Schedule {
        order_date,
        arrival_date,
        is_critical,
        arrival_delay_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    fn params(leadtime: i64) -> PlanningParameters {
        PlanningParameters::new(0.0, leadtime, d("2025-01-01"), d("2025-12-31"))
    }

    #[test]
    fn test_standard_schedule() {
        let schedule = schedule_group(d("2025-03-10"), &params(5), 2);
        assert_eq!(schedule.arrival_date, d("2025-03-08"));
        assert_eq!(schedule.order_date, d("2025-03-03"));
        assert!(!schedule.is_critical);
        assert_eq!(schedule.arrival_delay_days, None);
    }

    #[test]
    fn test_jit_schedule_orders_on_the_demand_day() {
        let schedule = schedule_group(d("2025-01-10"), &params(0), 0);
        assert_eq!(schedule.order_date, d("2025-01-10"));
        assert_eq!(schedule.arrival_date, d("2025-01-10"));
        assert!(!schedule.is_critical);
    }

    #[test]
    fn test_start_cutoff_clamp_marks_critical() {
        let mut p = params(10);
        p.start_cutoff = d("2025-02-01");
        let schedule = schedule_group(d("2025-02-05"), &p, 2);
        assert_eq!(schedule.order_date, d("2025-02-01"));
        assert_eq!(schedule.arrival_date, d("2025-02-11"));
        assert!(schedule.is_critical);
        assert_eq!(schedule.arrival_delay_days, Some(6));
    }

    #[test]
    fn test_end_cutoff_clamp() {
        let mut p = params(10);
        p.end_cutoff = d("2025-03-01");
        let schedule = schedule_group(d("2025-03-20"), &p, 2);
        assert_eq!(schedule.arrival_date, d("2025-03-01"));
        assert_eq!(schedule.order_date, d("2025-02-19"));
        assert!(!schedule.is_critical);
    }

    #[test]
    fn test_lead_time_identity_holds() {
        for leadtime in [0, 3, 14, 45, 90] {
            let schedule = schedule_group(d("2025-06-15"), &params(leadtime), 2);
            assert_eq!(
                days_between(schedule.order_date, schedule.arrival_date),
                leadtime
            );
        }
    }
}
