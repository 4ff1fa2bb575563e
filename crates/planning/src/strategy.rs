//! # Strategy Selector
//!
//! Deterministic replenishment strategy choice from the lead time, with a
//! profile-driven override for concentrated, unpredictable demand.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::demand::{ConcentrationLevel, DemandProfile, Predictability};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Zero lead time: order on the demand day, no buffers.
    Jit,
    /// 1 to 14 days: tight grouping, standard buffers.
    Short,
    /// 15 to 45 days: wider grouping windows.
    Medium,
    /// Above 45 days (or forced by the profile): coverage buffers and
    /// quantity distribution across batches.
    LongHybrid,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Jit => "jit",
            Strategy::Short => "short",
            Strategy::Medium => "medium",
            Strategy::LongHybrid => "long_hybrid",
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Strategy::LongHybrid)
    }
}

/// Pick the strategy for a lead time and demand profile.
///
/// Highly concentrated and unpredictable demand is planned with the
/// hybrid long-lead-time machinery even below the 46-day threshold, since
/// pure window grouping handles it poorly.
pub fn select_strategy(leadtime_days: i64, profile: &DemandProfile) -> Strategy {
    let by_leadtime = match leadtime_days {
        0 => Strategy::Jit,
        1..=14 => Strategy::Short,
        15..=45 => Strategy::Medium,
        _ => Strategy::LongHybrid,
    };

    if by_leadtime != Strategy::LongHybrid
        && leadtime_days > 0
        && profile.concentration_level == ConcentrationLevel::High
        && profile.predictability == Predictability::Low
    {
        debug!(
            leadtime_days,
            concentration = profile.concentration_index,
            cv = profile.coefficient_of_variation,
            "overriding {} strategy to hybrid for concentrated erratic demand",
            by_leadtime.label()
        );
        return Strategy::LongHybrid;
    }

    by_leadtime
}
