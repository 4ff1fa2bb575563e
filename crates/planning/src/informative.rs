//! # Informative / Excess Batch Generator
//!
//! Late post-step for callers that want output even when the planner
//! found no real need. Informative batches are purely descriptive and
//! never enter analytics arithmetic; forced-excess batches are real and
//! counted everywhere.

use chrono::NaiveDate;

use crate::demand::DemandProfile;
use crate::model::{Batch, BatchAnalytics, DemandEvent, PlanningParameters, UrgencyLevel};
use mrp_core::calendar::add_days;

/// Quantity reported when there is no demand at all.
const SYMBOLIC_QUANTITY: f64 = 50.0;

/// A zero-effect batch describing what production would look like.
pub fn informative_batch(params: &PlanningParameters, profile: &DemandProfile) -> Batch {
    let quantity = if profile.total_demand > 0.0 {
        profile.total_demand
    } else {
        SYMBOLIC_QUANTITY
    };
    let (order_date, arrival_date) = mid_period_placement(params);
    Batch {
        order_date,
        arrival_date,
        quantity,
        analytics: BatchAnalytics {
            actual_lead_time: params.leadtime_days,
            urgency_level: UrgencyLevel::Planned,
            informative_batch: true,
            actual_need: Some("none".to_string()),
            group_size: 0,
            ..BatchAnalytics::default()
        },
    }
}

/// A real batch produced despite zero shortfall; counted in analytics.
pub fn excess_batch(
    params: &PlanningParameters,
    profile: &DemandProfile,
    events: &[DemandEvent],
) -> Batch {
    let quantity = if profile.total_demand > 0.0 {
        profile.total_demand
    } else {
        SYMBOLIC_QUANTITY
    };
    let (order_date, arrival_date) = mid_period_placement(params);
    Batch {
        order_date,
        arrival_date,
        quantity,
        analytics: BatchAnalytics {
            actual_lead_time: params.leadtime_days,
            urgency_level: UrgencyLevel::Planned,
            excess_production: true,
            demands_covered: events.to_vec(),
            group_size: events.len(),
            efficiency_ratio: 1.0,
            ..BatchAnalytics::default()
        },
    }
}

/// Arrival near the middle of the period, clamped into the feasible
/// cutoff window. Callers check window feasibility first.
fn mid_period_placement(params: &PlanningParameters) -> (NaiveDate, NaiveDate) {
    let midpoint = add_days(params.period_start, params.period_length_days() / 2);
    let earliest_arrival = add_days(params.start_cutoff, params.leadtime_days);
    let arrival = midpoint.max(earliest_arrival).min(params.end_cutoff);
    (add_days(arrival, -params.leadtime_days), arrival)
}
