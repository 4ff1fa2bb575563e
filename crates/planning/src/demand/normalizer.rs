//! # Demand Normalizer
//!
//! Turns a raw `date -> quantity` map into the ordered, deduplicated event
//! list the planner works on. Entries outside the planning period and
//! non-positive quantities are dropped silently; duplicate dates are
//! coalesced by summing.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PlanningError, Result};
use crate::model::{DemandEvent, PlanningParameters};

/// Normalize raw demand against the planning period.
///
/// Fails with [`PlanningError::EmptyDemand`] only when nothing remains and
/// the caller did not ask for informative or forced-excess output.
pub fn normalize_demand(
    raw: &BTreeMap<NaiveDate, f64>,
    params: &PlanningParameters,
) -> Result<Vec<DemandEvent>> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (&date, &quantity) in raw {
        if !quantity.is_finite() || quantity <= 0.0 {
            debug!(%date, quantity, "dropping non-positive demand entry");
            continue;
        }
        if date < params.period_start || date > params.period_end {
            debug!(%date, quantity, "dropping out-of-period demand entry");
            continue;
        }
        *by_date.entry(date).or_insert(0.0) += quantity;
    }

    let events: Vec<DemandEvent> = by_date
        .into_iter()
        .map(|(date, quantity)| DemandEvent { date, quantity })
        .collect();

    if events.is_empty() && !params.wants_forced_output() {
        return Err(PlanningError::EmptyDemand);
    }

    Ok(events)
}
