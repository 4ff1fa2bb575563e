//! # Quantity Distribution (Phase E)
//!
//! For long lead times with several batches, the total quantity can be
//! re-spread across the fixed arrival dates. Four candidate shapes are
//! simulated against the incumbent allocation; a shape is applied only
//! when it strictly improves stockout severity, ties broken by the
//! lowest batch-size variation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{DemandEvent, PlanningParameters};
use crate::planner::CandidateBatch;
use crate::simulation::simulate;
use crate::sizing::BatchSizing;
use mrp_core::calendar::days_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionShape {
    /// Equal quantities on every arrival.
    Uniform,
    /// Linearly decreasing quantities.
    Progressive,
    /// Half the total on the first arrival, the rest spread evenly.
    FrontLoaded,
    /// Quantities proportional to the demand gap each arrival covers.
    SmartBalanced,
}

const SHAPES: [DistributionShape; 4] = [
    DistributionShape::Uniform,
    DistributionShape::Progressive,
    DistributionShape::FrontLoaded,
    DistributionShape::SmartBalanced,
];

/// Re-spread candidate quantities across their arrivals, keeping the
/// total constant. Returns the winning shape when a redistribution was
/// applied; `None` keeps the incumbent allocation.
pub fn optimize_distribution(
    candidates: &mut [CandidateBatch],
    params: &PlanningParameters,
    sizing: &BatchSizing,
    events: &[DemandEvent],
) -> Option<DistributionShape> {
    if candidates.len() < 2 {
        return None;
    }
    let total: f64 = candidates.iter().map(|c| c.quantity).sum();
    if total <= 0.0 {
        return None;
    }

    let incumbent: Vec<f64> = candidates.iter().map(|c| c.quantity).collect();
    let (mut best_severity, mut best_spread) = score(candidates, &incumbent, params, events);
    debug!(
        severity = best_severity,
        spread = best_spread,
        "incumbent allocation scored"
    );

    let mut winner: Option<(DistributionShape, Vec<f64>)> = None;
    for shape in SHAPES {
        let quantities = shape_quantities(shape, candidates, params, sizing, total);
        let (severity, spread) = score(candidates, &quantities, params, events);
        debug!(?shape, severity, spread, "distribution candidate scored");

        let better = severity + 1e-9 < best_severity
            || ((severity - best_severity).abs() <= 1e-9 && spread + 1e-9 < best_spread);
        if better {
            best_severity = severity;
            best_spread = spread;
            winner = Some((shape, quantities));
        }
    }

    let (shape, quantities) = winner?;
    debug!(?shape, severity = best_severity, "distribution selected");
    for (candidate, quantity) in candidates.iter_mut().zip(quantities) {
        candidate.quantity = quantity;
        candidate.long_leadtime_applied = true;
    }
    Some(shape)
}

fn score(
    candidates: &[CandidateBatch],
    quantities: &[f64],
    params: &PlanningParameters,
    events: &[DemandEvent],
) -> (f64, f64) {
    let arrivals: Vec<_> = candidates
        .iter()
        .zip(quantities)
        .map(|(c, &q)| (c.arrival_date, q))
        .collect();
    let result = simulate(
        params.initial_stock,
        params.period_start,
        params.period_end,
        &arrivals,
        events,
    );
    (result.stockout_severity, coefficient_of_variation(quantities))
}

fn shape_quantities(
    shape: DistributionShape,
    candidates: &[CandidateBatch],
    params: &PlanningParameters,
    sizing: &BatchSizing,
    total: f64,
) -> Vec<f64> {
    let count = candidates.len();
    let weights: Vec<f64> = match shape {
        DistributionShape::Uniform => vec![1.0; count],
        DistributionShape::Progressive => (0..count).map(|i| (count - i) as f64).collect(),
        DistributionShape::FrontLoaded => {
            let mut weights = vec![0.5 / (count as f64 - 1.0); count];
            weights[0] = 0.5;
            weights
        }
        DistributionShape::SmartBalanced => candidates
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let horizon = match candidates.get(i + 1) {
                    Some(next) => days_between(c.arrival_date, next.arrival_date),
                    None => days_between(c.arrival_date, params.period_end),
                };
                horizon.max(1) as f64
            })
            .collect(),
    };
    let weight_sum: f64 = weights.iter().sum();
    weights
        .iter()
        .map(|w| (total * w / weight_sum).clamp(sizing.min_batch, sizing.max_batch))
        .collect()
}

fn coefficient_of_variation(quantities: &[f64]) -> f64 {
    let mean = quantities.iter().sum::<f64>() / quantities.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = quantities
        .iter()
        .map(|q| (q - mean).powi(2))
        .sum::<f64>()
        / quantities.len() as f64;
    variance.sqrt() / mean
}
