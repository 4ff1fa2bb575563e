//! Rule-based recommendations. The list is order-stable: rules are
//! evaluated in a fixed sequence and produce fixed phrasings.

use crate::analytics::{CostAnalysis, PerformanceMetrics};
use crate::demand::DemandProfile;
use crate::model::{Batch, PlanningParameters};
use crate::simulation::SimulationResult;
use crate::strategy::Strategy;

pub fn build(
    params: &PlanningParameters,
    profile: &DemandProfile,
    strategy: Strategy,
    performance: &PerformanceMetrics,
    costs: &CostAnalysis,
    sim: &SimulationResult,
    batches: &[Batch],
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if params.leadtime_days > 45 {
        recommendations.push(format!(
            "Lead time of {} days forces large coverage buffers; negotiate a shorter supplier lead time to reduce held stock.",
            params.leadtime_days
        ));
    }

    if performance.realized_service_level < params.service_level {
        recommendations.push(format!(
            "Realized service level {:.1}% is below the {:.1}% target; increase the safety margin or order earlier.",
            performance.realized_service_level * 100.0,
            params.service_level * 100.0
        ));
    }

    if costs.holding_share_percent > 60.0 {
        recommendations.push(
            "Holding dominates total cost; consider smaller batches or later arrivals.".to_string(),
        );
    }

    if sim.stockout_days > 0 {
        recommendations.push(format!(
            "{} day(s) end below zero stock; raise buffers or advance the affected orders.",
            sim.stockout_days
        ));
    }

    if profile.coefficient_of_variation > 0.6 {
        recommendations.push(
            "Demand is erratic; the hybrid strategy with wider safety margins is advised."
                .to_string(),
        );
    }

    if !params.enable_consolidation && batches.len() >= 4 {
        recommendations.push(format!(
            "{} separate orders were planned; enabling consolidation would save setup costs.",
            batches.len()
        ));
    }

    if strategy == Strategy::Jit && params.initial_stock > profile.max_single_demand {
        recommendations.push(
            "Initial stock already covers the largest demand; JIT orders could be trimmed."
                .to_string(),
        );
    }

    recommendations
}
