//! Risk assessment over the simulated stock trajectory: stockout
//! probability, tail measures on daily stock levels, and demand
//! uncertainty.

use serde::{Deserialize, Serialize};

use crate::demand::DemandProfile;
use crate::model::StockSeverity;
use crate::simulation::SimulationResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Share of period days spent at stockout or critical levels.
    pub stockout_probability: f64,
    pub expected_stockouts_per_year: f64,
    /// 5th percentile of daily stock levels.
    pub value_at_risk_95: f64,
    /// Mean of the daily stock levels at or below the VaR.
    pub conditional_value_at_risk_95: f64,
    pub demand_uncertainty_cv: f64,
    pub demand_uncertainty_level: String,
}

pub fn assess(profile: &DemandProfile, sim: &SimulationResult, period_len_days: i64) -> RiskAssessment {
    let risky_days = sim
        .critical_points
        .iter()
        .filter(|p| matches!(p.severity, StockSeverity::Stockout | StockSeverity::Critical))
        .count();
    let stockout_probability = risky_days as f64 / period_len_days.max(1) as f64;

    let expected_stockouts_per_year =
        sim.stockout_days as f64 * 365.0 / period_len_days.max(1) as f64;

    let (value_at_risk_95, conditional_value_at_risk_95) = tail_measures(sim);

    let cv = profile.coefficient_of_variation;
    let demand_uncertainty_level = if cv <= 0.3 {
        "low"
    } else if cv <= 0.6 {
        "moderate"
    } else {
        "high"
    };

    RiskAssessment {
        stockout_probability,
        expected_stockouts_per_year,
        value_at_risk_95,
        conditional_value_at_risk_95,
        demand_uncertainty_cv: cv,
        demand_uncertainty_level: demand_uncertainty_level.to_string(),
    }
}

fn tail_measures(sim: &SimulationResult) -> (f64, f64) {
    let mut levels: Vec<f64> = sim.stock_evolution.values().copied().collect();
    if levels.is_empty() {
        return (0.0, 0.0);
    }
    levels.sort_by(|a, b| a.partial_cmp(b).expect("finite stock levels"));
    let index = ((levels.len() - 1) as f64 * 0.05).floor() as usize;
    let var = levels[index];
    let tail = &levels[..=index];
    let cvar = tail.iter().sum::<f64>() / tail.len() as f64;
    (var, cvar)
}
