//! Cost decomposition for one plan. Holding costs use the unit value
//! proxy, so every figure is reproducible from the call inputs alone.

use serde::{Deserialize, Serialize};

use crate::model::{Batch, PlanningParameters};
use crate::simulation::SimulationResult;
use crate::sizing::BatchSizing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostAnalysis {
    pub setup_cost: f64,
    pub holding_cost: f64,
    pub stockout_cost: f64,
    pub total_cost: f64,
    pub setup_share_percent: f64,
    pub holding_share_percent: f64,
    pub stockout_share_percent: f64,
}

pub fn analyze(
    params: &PlanningParameters,
    sizing: &BatchSizing,
    batches: &[Batch],
    sim: &SimulationResult,
    period_len_days: i64,
) -> CostAnalysis {
    let setup_cost = batches.len() as f64 * params.setup_cost;

    let levels: Vec<f64> = sim.stock_evolution.values().copied().collect();
    let average_stock = if levels.is_empty() {
        params.initial_stock
    } else {
        levels.iter().sum::<f64>() / levels.len() as f64
    };
    let period_years = period_len_days as f64 / 365.0;
    let holding_cost =
        average_stock.max(0.0) * sizing.unit_value_proxy * params.holding_cost_rate * period_years;

    let stockout_cost = sim.stockout_severity * params.stockout_cost_multiplier;

    let total_cost = setup_cost + holding_cost + stockout_cost;
    let share = |cost: f64| {
        if total_cost > 0.0 {
            cost / total_cost * 100.0
        } else {
            0.0
        }
    };

    CostAnalysis {
        setup_cost,
        holding_cost,
        stockout_cost,
        total_cost,
        setup_share_percent: share(setup_cost),
        holding_share_percent: share(holding_cost),
        stockout_share_percent: share(stockout_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::profile_demand;
    use crate::model::DemandEvent;
    use crate::simulation::simulate_batches;
    use crate::sizing;
    use chrono::NaiveDate;

    fn d(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    #[test]
    fn test_cost_shares_add_up() {
        let params = PlanningParameters::new(0.0, 5, d("2025-01-01"), d("2025-03-31"));
        let events = vec![DemandEvent {
            date: d("2025-02-10"),
            quantity: 400.0,
        }];
        let profile = profile_demand(&events, params.period_start, params.period_end);
        let est = sizing::estimate(&params, &profile);
        let sim = simulate_batches(0.0, params.period_start, params.period_end, &[], &events);
        let analysis = analyze(&params, &est, &[], &sim, params.period_length_days());
        assert_eq!(analysis.setup_cost, 0.0);
        assert!(analysis.stockout_cost > 0.0);
        let share_sum = analysis.setup_share_percent
            + analysis.holding_share_percent
            + analysis.stockout_share_percent;
        assert!((share_sum - 100.0).abs() < 1e-6);
    }
}
