//! # Analytics Assembler
//!
//! Derives the reporting bundle from one planning call: summary totals,
//! performance and cost metrics, demand statistics, risk assessment,
//! seasonality markers, what-if scenarios and rule-based
//! recommendations. Informative batches never reach this module; every
//! batch counted here is real.

pub mod costs;
pub mod recommendations;
pub mod risk;
pub mod whatif;

pub use costs::CostAnalysis;
pub use risk::RiskAssessment;
pub use whatif::WhatIfScenario;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::demand::DemandProfile;
use crate::model::{Batch, CriticalPoint, DemandEvent, PlanningParameters, StockEvolution};
use crate::simulation::SimulationResult;
use crate::sizing::BatchSizing;
use crate::strategy::Strategy;
use mrp_core::calendar::month_key;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsBundle {
    pub summary: PlanSummary,
    pub performance: PerformanceMetrics,
    pub costs: CostAnalysis,
    pub demand: DemandMetrics,
    pub risk: RiskAssessment,
    pub seasonality: SeasonalityMarkers,
    pub what_if: Vec<WhatIfScenario>,
    pub recommendations: Vec<String>,
    pub critical_points: Vec<CriticalPoint>,
    pub stock_evolution: StockEvolution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub strategy: String,
    pub initial_stock: f64,
    pub final_stock: f64,
    pub minimum_stock: f64,
    pub minimum_stock_date: NaiveDate,
    pub total_batches: usize,
    pub total_produced: f64,
    pub total_demand: f64,
    pub demand_events: usize,
    /// `total_produced / total_demand`.
    pub production_coverage_rate: f64,
    /// Percentage of demand events served without a negative day.
    pub demand_fulfillment_rate: f64,
    pub unmet_demand: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub realized_service_level: f64,
    pub inventory_turnover: f64,
    pub average_days_of_inventory: f64,
    pub setup_frequency_per_month: f64,
    pub average_batch_size: f64,
    pub average_stock: f64,
    pub stock_coefficient_of_variation: f64,
    /// Share of batches that arrived on time within their size bounds.
    pub perfect_order_rate: f64,
}

/// Demand statistics: the profiler output plus the monthly distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandMetrics {
    #[serde(flatten)]
    pub profile: DemandProfile,
    pub monthly_totals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityMarkers {
    pub monthly_indices: BTreeMap<String, f64>,
    pub peak_months: Vec<String>,
    pub trend_slope: f64,
    pub trend_direction: String,
}

/// Build the full analytics bundle for one simulated plan.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    params: &PlanningParameters,
    events: &[DemandEvent],
    profile: &DemandProfile,
    sizing: &BatchSizing,
    strategy: Strategy,
    batches: &[Batch],
    sim: &SimulationResult,
    unmet_demand: f64,
) -> AnalyticsBundle {
    let period_len = params.period_length_days().max(1);
    let total_produced: f64 = batches.iter().map(|b| b.quantity).sum();

    let demands_met = events
        .iter()
        .filter(|e| {
            sim.stock_evolution
                .get(&e.date)
                .map(|&stock| stock >= -1e-9)
                .unwrap_or(false)
        })
        .count();

    let summary = PlanSummary {
        strategy: strategy.label().to_string(),
        initial_stock: params.initial_stock,
        final_stock: sim.final_stock,
        minimum_stock: sim.minimum_stock,
        minimum_stock_date: sim.minimum_stock_date,
        total_batches: batches.len(),
        total_produced,
        total_demand: profile.total_demand,
        demand_events: events.len(),
        production_coverage_rate: if profile.total_demand > 0.0 {
            total_produced / profile.total_demand
        } else {
            0.0
        },
        demand_fulfillment_rate: if events.is_empty() {
            100.0
        } else {
            demands_met as f64 / events.len() as f64 * 100.0
        },
        unmet_demand,
    };

    let performance = performance_metrics(params, profile, sizing, batches, sim, demands_met, events.len());
    let costs = costs::analyze(params, sizing, batches, sim, period_len);
    let risk = risk::assess(profile, sim, period_len);
    let what_if = whatif::scenarios(params, sizing, &costs, period_len);
    let recommendations =
        recommendations::build(params, profile, strategy, &performance, &costs, sim, batches);

    AnalyticsBundle {
        summary,
        performance,
        costs,
        demand: DemandMetrics {
            profile: profile.clone(),
            monthly_totals: monthly_totals(events),
        },
        risk,
        seasonality: seasonality_markers(profile),
        what_if,
        recommendations,
        critical_points: sim.critical_points.clone(),
        stock_evolution: sim.stock_evolution.clone(),
    }
}

fn performance_metrics(
    params: &PlanningParameters,
    profile: &DemandProfile,
    sizing: &BatchSizing,
    batches: &[Batch],
    sim: &SimulationResult,
    demands_met: usize,
    event_count: usize,
) -> PerformanceMetrics {
    let period_len = params.period_length_days().max(1);
    let levels: Vec<f64> = sim.stock_evolution.values().copied().collect();
    let average_stock = if levels.is_empty() {
        params.initial_stock
    } else {
        levels.iter().sum::<f64>() / levels.len() as f64
    };

    let stock_coefficient_of_variation = if average_stock > 0.0 && levels.len() > 1 {
        let variance = levels
            .iter()
            .map(|v| (v - average_stock).powi(2))
            .sum::<f64>()
            / levels.len() as f64;
        variance.sqrt() / average_stock
    } else {
        0.0
    };

    let total_produced: f64 = batches.iter().map(|b| b.quantity).sum();
    let perfect_orders = batches
        .iter()
        .filter(|b| {
            !b.analytics.is_critical
                && b.quantity >= sizing.min_batch - 1e-9
                && b.quantity <= sizing.max_batch + 1e-9
        })
        .count();

    PerformanceMetrics {
        realized_service_level: if event_count == 0 {
            1.0
        } else {
            demands_met as f64 / event_count as f64
        },
        inventory_turnover: if average_stock > 0.0 {
            profile.total_demand / average_stock
        } else {
            0.0
        },
        average_days_of_inventory: if profile.mean_daily_demand > 0.0 {
            average_stock / profile.mean_daily_demand
        } else {
            0.0
        },
        setup_frequency_per_month: batches.len() as f64 / period_len as f64 * 30.0,
        average_batch_size: if batches.is_empty() {
            0.0
        } else {
            total_produced / batches.len() as f64
        },
        average_stock,
        stock_coefficient_of_variation,
        perfect_order_rate: if batches.is_empty() {
            1.0
        } else {
            perfect_orders as f64 / batches.len() as f64
        },
    }
}

fn monthly_totals(events: &[DemandEvent]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for event in events {
        *totals.entry(month_key(event.date)).or_insert(0.0) += event.quantity;
    }
    totals
}

fn seasonality_markers(profile: &DemandProfile) -> SeasonalityMarkers {
    let peak_months = profile
        .monthly_indices
        .iter()
        .filter(|(_, &index)| index > 1.2)
        .map(|(month, _)| month.clone())
        .collect();
    let trend_direction = if profile.trend_slope > 0.01 {
        "increasing"
    } else if profile.trend_slope < -0.01 {
        "decreasing"
    } else {
        "stable"
    };
    SeasonalityMarkers {
        monthly_indices: profile.monthly_indices.clone(),
        peak_months,
        trend_slope: profile.trend_slope,
        trend_direction: trend_direction.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::profile_demand;
    use crate::simulation::simulate_batches;
    use crate::sizing;

    fn d(text: &str) -> NaiveDate {
        text.parse().unwrap()
    }

    fn ev(date: &str, quantity: f64) -> DemandEvent {
        DemandEvent {
            date: d(date),
            quantity,
        }
    }

    #[test]
    fn test_summary_totals_without_batches() {
        let params = PlanningParameters::new(500.0, 5, d("2025-01-01"), d("2025-01-31"));
        let events = vec![ev("2025-01-10", 100.0), ev("2025-01-20", 150.0)];
        let profile = profile_demand(&events, params.period_start, params.period_end);
        let est = sizing::estimate(&params, &profile);
        let sim = simulate_batches(500.0, params.period_start, params.period_end, &[], &events);
        let bundle = assemble(
            &params,
            &events,
            &profile,
            &est,
            Strategy::Short,
            &[],
            &sim,
            0.0,
        );
        assert_eq!(bundle.summary.total_batches, 0);
        assert_eq!(bundle.summary.total_produced, 0.0);
        assert_eq!(bundle.summary.final_stock, 250.0);
        assert_eq!(bundle.summary.demand_fulfillment_rate, 100.0);
        assert_eq!(bundle.performance.perfect_order_rate, 1.0);
        assert_eq!(bundle.costs.setup_cost, 0.0);
    }

    #[test]
    fn test_fulfillment_counts_stockout_days() {
        let params = PlanningParameters::new(100.0, 5, d("2025-01-01"), d("2025-01-31"));
        let events = vec![ev("2025-01-10", 80.0), ev("2025-01-20", 80.0)];
        let profile = profile_demand(&events, params.period_start, params.period_end);
        let est = sizing::estimate(&params, &profile);
        let sim = simulate_batches(100.0, params.period_start, params.period_end, &[], &events);
        let bundle = assemble(
            &params,
            &events,
            &profile,
            &est,
            Strategy::Short,
            &[],
            &sim,
            0.0,
        );
        // The second demand goes negative.
        assert_eq!(bundle.summary.demand_fulfillment_rate, 50.0);
        assert_eq!(bundle.performance.realized_service_level, 0.5);
        assert!(bundle.costs.stockout_cost > 0.0);
    }

    #[test]
    fn test_monthly_totals() {
        let events = vec![
            ev("2025-01-10", 100.0),
            ev("2025-01-20", 50.0),
            ev("2025-02-05", 30.0),
        ];
        let totals = monthly_totals(&events);
        assert_eq!(totals["2025-01"], 150.0);
        assert_eq!(totals["2025-02"], 30.0);
    }
}
