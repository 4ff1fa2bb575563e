//! # Batch-Size Estimator
//!
//! Economic order quantity, safety stock, reorder point and batch bounds
//! derived from the demand profile. EOQ is advisory; the hard outputs are
//! the `[min_batch, max_batch]` clamp and the safety-stock level used by
//! the planner.

use serde::{Deserialize, Serialize};

use crate::demand::DemandProfile;
use crate::model::PlanningParameters;

/// Inverse-normal table for the supported service levels; linear
/// interpolation in between, clamped at the ends.
const Z_TABLE: [(f64, f64); 4] = [(0.90, 1.28), (0.95, 1.65), (0.98, 2.05), (0.99, 2.33)];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSizing {
    /// Advisory economic order quantity; 0 when inputs are degenerate.
    pub economic_order_quantity: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub min_batch: f64,
    pub max_batch: f64,
    /// Unit value proxy used where no explicit unit cost exists:
    /// `holding_cost_rate * mean_daily_demand * 365`.
    pub unit_value_proxy: f64,
    /// Holding cost per unit per day under the proxy valuation.
    pub daily_holding_cost: f64,
}

/// Service-level z-score from the small inverse-normal table.
pub fn z_score(service_level: f64) -> f64 {
    let (first_level, first_z) = Z_TABLE[0];
    if service_level <= first_level {
        return first_z;
    }
    for pair in Z_TABLE.windows(2) {
        let (low_level, low_z) = pair[0];
        let (high_level, high_z) = pair[1];
        if service_level <= high_level {
            let fraction = (service_level - low_level) / (high_level - low_level);
            return low_z + fraction * (high_z - low_z);
        }
    }
    Z_TABLE[Z_TABLE.len() - 1].1
}

/// Compute batch bounds and buffers for one planning call.
pub fn estimate(params: &PlanningParameters, profile: &DemandProfile) -> BatchSizing {
    let unit_value_proxy = params.holding_cost_rate * profile.mean_daily_demand * 365.0;
    let daily_holding_cost = unit_value_proxy * params.holding_cost_rate / 365.0;

    let economic_order_quantity = if params.enable_eoq_optimization {
        let annual_demand = profile.mean_daily_demand * 365.0;
        let unit_holding_cost = params.holding_cost_rate * unit_value_proxy;
        if annual_demand > 0.0 && params.setup_cost > 0.0 && unit_holding_cost > 0.0 {
            (2.0 * annual_demand * params.setup_cost / unit_holding_cost).sqrt()
        } else {
            0.0
        }
    } else {
        0.0
    };

    let raw_safety =
        z_score(params.service_level) * profile.stdev * (params.leadtime_days as f64).sqrt();
    let cap_days = f64::max(30.0, 0.3 * params.leadtime_days as f64);
    let safety_cap = cap_days * profile.mean_daily_demand;
    let safety_stock = raw_safety.min(safety_cap).max(0.0);

    let reorder_point = profile.mean_daily_demand * params.leadtime_days as f64 + safety_stock;

    let min_batch = if params.exact_quantity_match {
        0.0
    } else {
        params.min_batch_size.max(1.0)
    };

    let max_batch = match params.max_batch_size {
        Some(explicit) => explicit,
        None if params.auto_calculate_max_batch_size => {
            let multiplier = params.max_batch_multiplier.max(2.0);
            f64::max(
                profile.total_demand,
                profile.max_single_demand * multiplier,
            )
            .max(min_batch)
        }
        None => f64::INFINITY,
    };

    BatchSizing {
        economic_order_quantity,
        safety_stock,
        reorder_point,
        min_batch,
        max_batch,
        unit_value_proxy,
        daily_holding_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::profile_demand;
    use crate::model::DemandEvent;
    use chrono::NaiveDate;

    fn d(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    fn sample_profile() -> DemandProfile {
        let events = vec![
            DemandEvent {
                date: d("2025-01-10"),
                quantity: 100.0,
            },
            DemandEvent {
                date: d("2025-02-10"),
                quantity: 200.0,
            },
            DemandEvent {
                date: d("2025-03-10"),
                quantity: 300.0,
            },
        ];
        profile_demand(&events, d("2025-01-01"), d("2025-03-31"))
    }

    #[test]
    fn test_z_score_table_and_interpolation() {
        assert_eq!(z_score(0.90), 1.28);
        assert_eq!(z_score(0.95), 1.65);
        assert_eq!(z_score(0.98), 2.05);
        assert_eq!(z_score(0.99), 2.33);
        // Below and above the table clamps to the end values.
        assert_eq!(z_score(0.50), 1.28);
        assert_eq!(z_score(0.999), 2.33);
        // Halfway between 0.90 and 0.95.
        assert!((z_score(0.925) - 1.465).abs() < 1e-9);
    }

    #[test]
    fn test_safety_stock_uses_leadtime_spread() {
        let profile = sample_profile();
        let mut params = PlanningParameters::new(0.0, 16, d("2025-01-01"), d("2025-03-31"));
        params.service_level = 0.95;
        let sizing = estimate(&params, &profile);
        let expected = 1.65 * profile.stdev * 4.0;
        let cap = 30.0 * profile.mean_daily_demand;
        assert!((sizing.safety_stock - expected.min(cap)).abs() < 1e-9);
        assert!(sizing.safety_stock <= cap + 1e-9);
    }

    #[test]
    fn test_reorder_point() {
        let profile = sample_profile();
        let params = PlanningParameters::new(0.0, 10, d("2025-01-01"), d("2025-03-31"));
        let sizing = estimate(&params, &profile);
        assert!(
            (sizing.reorder_point - (profile.mean_daily_demand * 10.0 + sizing.safety_stock)).abs()
                < 1e-9
        );
    }

    #[test]
    fn test_auto_max_batch() {
        let profile = sample_profile();
        let mut params = PlanningParameters::new(0.0, 10, d("2025-01-01"), d("2025-03-31"));
        params.max_batch_multiplier = 2.0;
        let sizing = estimate(&params, &profile);
        // total 600 dominates max_single 300 * 2.
        assert_eq!(sizing.max_batch, 600.0);

        params.max_batch_size = Some(450.0);
        let sizing = estimate(&params, &profile);
        assert_eq!(sizing.max_batch, 450.0);
    }

    #[test]
    fn test_min_batch_floor_and_exact_match_relaxation() {
        let profile = sample_profile();
        let mut params = PlanningParameters::new(0.0, 10, d("2025-01-01"), d("2025-03-31"));
        params.min_batch_size = 0.0;
        let sizing = estimate(&params, &profile);
        assert_eq!(sizing.min_batch, 1.0);

        params.exact_quantity_match = true;
        let sizing = estimate(&params, &profile);
        assert_eq!(sizing.min_batch, 0.0);
    }

    #[test]
    fn test_eoq_disabled() {
        let profile = sample_profile();
        let mut params = PlanningParameters::new(0.0, 10, d("2025-01-01"), d("2025-03-31"));
        params.enable_eoq_optimization = false;
        let sizing = estimate(&params, &profile);
        assert_eq!(sizing.economic_order_quantity, 0.0);
    }
}
