//! # Quantity Computation (Phase C)
//!
//! A batch covers its group's shortfall against projected stock, plus the
//! configured safety margin and minimum-stock floor. Long lead times with
//! a wide gap to the next demand additionally carry a critical buffer,
//! lead-time safety, and a weighted share of forward demand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::demand::DemandProfile;
use crate::model::{DemandEvent, PlanningParameters};
use crate::planner::grouping::DemandGroup;
use crate::sizing::BatchSizing;
use mrp_core::calendar::days_between;

const EPSILON: f64 = 1e-9;

/// Long-lead-time machinery engages at this many days of lead time.
pub const LONG_LEADTIME_DAYS: i64 = 45;

/// Weight of a forward demand at the far edge of the coverage window.
const FUTURE_WEIGHT_FLOOR: f64 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityBreakdown {
    pub shortfall: f64,
    pub safety_margin: f64,
    pub minimum_stock_floor: f64,
    pub critical_buffer: f64,
    pub lead_time_safety: f64,
    pub future_demand_weighted: f64,
    pub unclamped_total: f64,
    /// Final quantity after the `[min_batch, max_batch]` clamp.
    pub quantity: f64,
    pub capacity_exceeded: bool,
    /// Real demand left uncovered by the clamp.
    pub unmet_demand: f64,
    pub gap_to_next_demand: Option<i64>,
    pub long_leadtime_applied: bool,
}

/// Compute the quantity for a group arriving at `arrival`.
///
/// `stock_before` is the projected stock at arrival (initial stock plus
/// earlier batches minus earlier groups' demand). `next_demand` is the
/// first event of the following group; `future` holds every event after
/// this group.
#[allow(clippy::too_many_arguments)]
pub fn compute_quantity(
    group: &DemandGroup,
    stock_before: f64,
    arrival: NaiveDate,
    next_demand: Option<&DemandEvent>,
    future: &[DemandEvent],
    window_days: i64,
    params: &PlanningParameters,
    profile: &DemandProfile,
    sizing: &BatchSizing,
    jit: bool,
) -> QuantityBreakdown {
    let group_demand = group.total_quantity();
    let shortfall = (group_demand - stock_before).max(0.0);

    let gap_to_next_demand = next_demand.map(|n| days_between(group.last_date(), n.date));

    if shortfall <= EPSILON {
        debug!(
            group_start = %group.first_date(),
            stock_before,
            group_demand,
            "projected stock covers the group, no batch needed"
        );
        return QuantityBreakdown {
            shortfall: 0.0,
            safety_margin: 0.0,
            minimum_stock_floor: 0.0,
            critical_buffer: 0.0,
            lead_time_safety: 0.0,
            future_demand_weighted: 0.0,
            unclamped_total: 0.0,
            quantity: 0.0,
            capacity_exceeded: false,
            unmet_demand: 0.0,
            gap_to_next_demand,
            long_leadtime_applied: false,
        };
    }

    // JIT orders arrive on the demand day; buffers have nothing to buy.
    let buffers_suppressed = jit || params.ignore_safety_stock;
    let safety_margin = if buffers_suppressed {
        0.0
    } else {
        shortfall * params.safety_margin_percent / 100.0
    };
    let minimum_stock_floor = if buffers_suppressed {
        0.0
    } else {
        params.minimum_stock_percent / 100.0 * profile.max_single_demand
    };

    // Gap to the next demand, or to the period end for the last group.
    // The coverage extension is buffering machinery, so the
    // ignore-safety-stock mode suppresses it as well.
    let effective_gap =
        gap_to_next_demand.unwrap_or_else(|| days_between(group.last_date(), params.period_end));
    let long_leadtime_applied = !buffers_suppressed
        && params.leadtime_days >= LONG_LEADTIME_DAYS
        && effective_gap > params.leadtime_days;

    let (critical_buffer, lead_time_safety, future_demand_weighted) = if long_leadtime_applied {
        let critical_buffer = 0.5 * group_demand;
        let lead_time_safety =
            profile.mean_daily_demand * (0.3 * params.leadtime_days as f64).min(45.0);
        let future_demand_weighted = weighted_future_demand(future, arrival, window_days);
        (critical_buffer, lead_time_safety, future_demand_weighted)
    } else {
        (0.0, 0.0, 0.0)
    };

    let unclamped_total =
        shortfall + safety_margin + minimum_stock_floor + critical_buffer + lead_time_safety
            + future_demand_weighted;

    let quantity = unclamped_total.clamp(sizing.min_batch, sizing.max_batch);
    let capacity_exceeded = unclamped_total > sizing.max_batch + EPSILON;
    let unmet_demand = if capacity_exceeded {
        (shortfall - quantity).max(0.0)
    } else {
        0.0
    };

    QuantityBreakdown {
        shortfall,
        safety_margin,
        minimum_stock_floor,
        critical_buffer,
        lead_time_safety,
        future_demand_weighted,
        unclamped_total,
        quantity,
        capacity_exceeded,
        unmet_demand,
        gap_to_next_demand,
        long_leadtime_applied,
    }
}

/// Forward demand inside the coverage window, weighted linearly from 1.0
/// at the arrival day down to the floor at the window edge.
fn weighted_future_demand(future: &[DemandEvent], arrival: NaiveDate, window_days: i64) -> f64 {
    if window_days <= 0 {
        return 0.0;
    }
    future
        .iter()
        .filter_map(|event| {
            let distance = days_between(arrival, event.date);
            if distance <= 0 || distance > window_days {
                return None;
            }
            let fraction = distance as f64 / window_days as f64;
            let weight = 1.0 - (1.0 - FUTURE_WEIGHT_FLOOR) * fraction;
            Some(event.quantity * weight)
        })
        .sum()
}
