//! # Batch Planner
//!
//! The planning façade walks normalized demand through grouping,
//! scheduling, quantity computation, consolidation and, for long lead
//! times, quantity distribution, then derives the analytics bundle from
//! a day-by-day simulation of the result.

pub mod consolidation;
pub mod distribution;
pub mod grouping;
pub mod quantity;
pub mod scheduling;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::analytics::{self, AnalyticsBundle};
use crate::demand::{normalize_demand, profile_demand, DemandProfile};
use crate::error::{PlanningError, Result};
use crate::informative;
use crate::model::{
    Batch, BatchAnalytics, DemandEvent, PlanningParameters, UrgencyLevel,
};
use crate::simulation::simulate_batches;
use crate::sizing::{self, BatchSizing};
use crate::strategy::{select_strategy, Strategy};
use consolidation::{ConsolidationDecision, ConsolidationSummary};
use grouping::{build_groups, coverage_window_days};
use mrp_core::calendar::days_between;
use quantity::compute_quantity;
use scheduling::schedule_group;

/// Result of one planning call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub batches: Vec<Batch>,
    pub analytics: AnalyticsBundle,
}

/// Intermediate batch owned by the planner while the phases run.
#[derive(Debug, Clone)]
pub struct CandidateBatch {
    pub order_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub quantity: f64,
    pub events: Vec<DemandEvent>,
    pub is_critical: bool,
    pub arrival_delay_days: Option<i64>,
    pub overlap_prevented: bool,
    pub shortfall: f64,
    pub unmet_demand: f64,
    pub capacity_exceeded: bool,
    pub long_leadtime_applied: bool,
    pub future_demand_weighted: f64,
    pub coverage_window_days: i64,
    pub gap_to_next_demand: Option<i64>,
    pub consolidation: Option<ConsolidationSummary>,
}

impl CandidateBatch {
    /// Merge `later` into this batch, keeping this schedule.
    pub(crate) fn absorb(&mut self, later: CandidateBatch, decision: &ConsolidationDecision) {
        self.quantity += later.quantity;
        self.shortfall += later.shortfall;
        self.unmet_demand += later.unmet_demand;
        self.events.extend(later.events);
        self.is_critical |= later.is_critical;
        self.capacity_exceeded |= later.capacity_exceeded;
        self.overlap_prevented |= later.overlap_prevented;
        self.long_leadtime_applied |= later.long_leadtime_applied;
        self.future_demand_weighted += later.future_demand_weighted;
        self.gap_to_next_demand = later.gap_to_next_demand;

        let summary = self
            .consolidation
            .get_or_insert_with(ConsolidationSummary::default);
        if let Some(later_summary) = later.consolidation {
            summary.merged_pairs += later_summary.merged_pairs;
            summary.net_savings += later_summary.net_savings;
            summary.holding_cost_increase += later_summary.holding_cost_increase;
            summary.rules.extend(later_summary.rules);
        }
        summary.merged_pairs += 1;
        summary.net_savings += decision.net_benefit;
        summary.holding_cost_increase += decision.holding_cost_increase;
        if let Some(rule) = decision.rule {
            summary.rules.push(rule);
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(arrival_date: NaiveDate, quantity: f64) -> Self {
        Self {
            order_date: arrival_date,
            arrival_date,
            quantity,
            events: Vec::new(),
            is_critical: false,
            arrival_delay_days: None,
            overlap_prevented: false,
            shortfall: quantity,
            unmet_demand: 0.0,
            capacity_exceeded: false,
            long_leadtime_applied: false,
            future_demand_weighted: 0.0,
            coverage_window_days: 0,
            gap_to_next_demand: None,
            consolidation: None,
        }
    }
}

/// Public entry point composing the full planning pipeline.
#[derive(Debug, Default)]
pub struct PlanningEngine;

impl PlanningEngine {
    pub fn new() -> Self {
        Self
    }

    /// Plan replenishment for one call. Pure with respect to its inputs;
    /// the only side effect is tracing.
    pub fn plan(
        &self,
        params: &PlanningParameters,
        raw_demand: &BTreeMap<NaiveDate, f64>,
    ) -> Result<PlanOutcome> {
        params.validate()?;
        let events = normalize_demand(raw_demand, params)?;
        let profile = profile_demand(&events, params.period_start, params.period_end);
        let sizing = sizing::estimate(params, &profile);
        let strategy = select_strategy(params.leadtime_days, &profile);

        if !params.window_is_feasible() {
            warn!(
                start_cutoff = %params.start_cutoff,
                end_cutoff = %params.end_cutoff,
                leadtime_days = params.leadtime_days,
                "infeasible window, reporting analytics without batches"
            );
            let sim = simulate_batches(
                params.initial_stock,
                params.period_start,
                params.period_end,
                &[],
                &events,
            );
            let bundle =
                analytics::assemble(params, &events, &profile, &sizing, strategy, &[], &sim, 0.0);
            return Err(PlanningError::InfeasibleWindow {
                start_cutoff: params.start_cutoff,
                end_cutoff: params.end_cutoff,
                leadtime_days: params.leadtime_days,
                analytics: Box::new(bundle),
            });
        }

        let mut candidates = build_candidates(&events, params, &profile, &sizing, strategy);

        if params.enable_consolidation && candidates.len() > 1 {
            consolidation::consolidate(&mut candidates, params, &profile, &sizing);
        }
        if params.leadtime_days >= quantity::LONG_LEADTIME_DAYS && candidates.len() >= 2 {
            distribution::optimize_distribution(&mut candidates, params, &sizing, &events);
        }
        if params.exact_quantity_match {
            normalize_exact_quantities(&mut candidates, params.initial_stock, profile.total_demand);
        }

        let unmet_demand: f64 = candidates.iter().map(|c| c.unmet_demand).sum();
        let batches = finalize_batches(&candidates, params, &events);

        if batches.is_empty() && params.wants_forced_output() {
            return Ok(forced_outcome(params, &events, &profile, &sizing, strategy));
        }

        let sim = simulate_batches(
            params.initial_stock,
            params.period_start,
            params.period_end,
            &batches,
            &events,
        );
        let bundle = analytics::assemble(
            params,
            &events,
            &profile,
            &sizing,
            strategy,
            &batches,
            &sim,
            unmet_demand,
        );
        info!(
            batches = batches.len(),
            strategy = strategy.label(),
            total_produced = bundle.summary.total_produced,
            final_stock = bundle.summary.final_stock,
            "planning completed"
        );
        Ok(PlanOutcome {
            batches,
            analytics: bundle,
        })
    }
}

/// Phases A to C: group demand, schedule each group, size each batch.
fn build_candidates(
    events: &[DemandEvent],
    params: &PlanningParameters,
    profile: &DemandProfile,
    sizing: &BatchSizing,
    strategy: Strategy,
) -> Vec<CandidateBatch> {
    if events.is_empty() {
        return Vec::new();
    }
    let jit = strategy == Strategy::Jit;
    let window = coverage_window_days(strategy, params.leadtime_days, params.max_gap_days);
    let groups = build_groups(events, strategy, params);
    let safety_days = if jit { 0 } else { params.safety_days };

    let mut candidates = Vec::new();
    let mut produced = 0.0;
    let mut prior_group_demand = 0.0;

    for (index, group) in groups.iter().enumerate() {
        let schedule = schedule_group(group.first_date(), params, safety_days);
        let stock_before = params.initial_stock + produced - prior_group_demand;
        let next_demand = groups.get(index + 1).map(|g| g.events[0]);
        let future: Vec<DemandEvent> = events
            .iter()
            .copied()
            .filter(|e| e.date > group.last_date())
            .collect();

        let breakdown = compute_quantity(
            group,
            stock_before,
            schedule.arrival_date,
            next_demand.as_ref(),
            &future,
            window,
            params,
            profile,
            sizing,
            jit,
        );
        prior_group_demand += group.total_quantity();

        if breakdown.quantity <= 0.0 {
            continue;
        }
        produced += breakdown.quantity;
        candidates.push(CandidateBatch {
            order_date: schedule.order_date,
            arrival_date: schedule.arrival_date,
            quantity: breakdown.quantity,
            events: group.events.clone(),
            is_critical: schedule.is_critical || breakdown.capacity_exceeded,
            arrival_delay_days: schedule.arrival_delay_days,
            overlap_prevented: group.overlap_prevented,
            shortfall: breakdown.shortfall,
            unmet_demand: breakdown.unmet_demand,
            capacity_exceeded: breakdown.capacity_exceeded,
            long_leadtime_applied: breakdown.long_leadtime_applied,
            future_demand_weighted: breakdown.future_demand_weighted,
            coverage_window_days: window,
            gap_to_next_demand: breakdown.gap_to_next_demand,
            consolidation: None,
        });
    }
    candidates
}

/// Scale batch quantities so their sum matches net demand exactly, with
/// the rounding residual landing on the last batch.
fn normalize_exact_quantities(
    candidates: &mut Vec<CandidateBatch>,
    initial_stock: f64,
    total_demand: f64,
) {
    if candidates.is_empty() {
        return;
    }
    let target = (total_demand - initial_stock).max(0.0);
    let current: f64 = candidates.iter().map(|c| c.quantity).sum();

    if current <= 0.0 {
        if let Some(last) = candidates.last_mut() {
            last.quantity = target;
        }
    } else {
        let scale = target / current;
        for candidate in candidates.iter_mut() {
            candidate.quantity *= scale;
        }
        let scaled_sum: f64 = candidates.iter().map(|c| c.quantity).sum();
        if let Some(last) = candidates.last_mut() {
            last.quantity += target - scaled_sum;
        }
    }
    candidates.retain(|c| c.quantity > 1e-9);
}

/// Phase F: convert candidates into emitted batches with full analytics.
fn finalize_batches(
    candidates: &[CandidateBatch],
    params: &PlanningParameters,
    events: &[DemandEvent],
) -> Vec<Batch> {
    let mut batches = Vec::with_capacity(candidates.len());
    let mut produced_before = 0.0;
    let mut prev_arrival: Option<NaiveDate> = None;

    for candidate in candidates {
        let demand_before: f64 = events
            .iter()
            .filter(|e| e.date < candidate.arrival_date)
            .map(|e| e.quantity)
            .sum();
        let stock_before_arrival = params.initial_stock + produced_before - demand_before;
        let stock_after_arrival = stock_before_arrival + candidate.quantity;

        let consumption_since_last_arrival: f64 = events
            .iter()
            .filter(|e| {
                e.date < candidate.arrival_date
                    && prev_arrival.map_or(true, |prev| e.date >= prev)
            })
            .map(|e| e.quantity)
            .sum();

        let coverage_days = forward_coverage_days(
            stock_after_arrival,
            candidate.arrival_date,
            params.period_end,
            events,
        );

        let group_demand: f64 = candidate.events.iter().map(|e| e.quantity).sum();
        let first_covered = candidate.events.first().map(|e| e.date);
        let safety_margin_days = first_covered
            .map(|date| days_between(candidate.arrival_date, date).max(0))
            .unwrap_or(0);

        let urgency_level = if params.leadtime_days == 0 {
            UrgencyLevel::Jit
        } else if candidate.is_critical {
            UrgencyLevel::Critical
        } else if safety_margin_days < params.safety_days {
            UrgencyLevel::High
        } else if safety_margin_days <= params.safety_days + 5 {
            UrgencyLevel::Normal
        } else {
            UrgencyLevel::Planned
        };

        let long = candidate.long_leadtime_applied;
        let analytics = BatchAnalytics {
            stock_before_arrival,
            stock_after_arrival,
            consumption_since_last_arrival,
            coverage_days,
            actual_lead_time: days_between(candidate.order_date, candidate.arrival_date),
            urgency_level,
            is_critical: candidate.is_critical,
            demands_covered: candidate.events.clone(),
            shortfall_covered: candidate.shortfall,
            efficiency_ratio: if group_demand > 0.0 {
                candidate.quantity / group_demand
            } else {
                0.0
            },
            safety_margin_days,
            consolidated_group: candidate.events.len() > 1,
            group_size: candidate.events.len(),
            consolidation_quality: candidate
                .consolidation
                .as_ref()
                .map(|summary| summary.quality(params.setup_cost)),
            net_savings: candidate
                .consolidation
                .as_ref()
                .map(|summary| summary.net_savings)
                .unwrap_or(0.0),
            holding_cost_increase: candidate
                .consolidation
                .as_ref()
                .map(|summary| summary.holding_cost_increase)
                .unwrap_or(0.0),
            overlap_prevented: candidate.overlap_prevented,
            arrival_delay_days: candidate.arrival_delay_days,
            long_leadtime_optimization: long,
            future_demand_considered: long.then_some(candidate.future_demand_weighted),
            coverage_window_days: long.then_some(candidate.coverage_window_days),
            gap_to_next_demand: candidate.gap_to_next_demand,
            informative_batch: false,
            excess_production: false,
            actual_need: None,
        };

        batches.push(Batch {
            order_date: candidate.order_date,
            arrival_date: candidate.arrival_date,
            quantity: candidate.quantity,
            analytics,
        });
        produced_before += candidate.quantity;
        prev_arrival = Some(candidate.arrival_date);
    }
    batches
}

/// Days the given stock lasts against forward demand from `from`.
fn forward_coverage_days(
    stock: f64,
    from: NaiveDate,
    period_end: NaiveDate,
    events: &[DemandEvent],
) -> i64 {
    let mut remaining = stock;
    for event in events.iter().filter(|e| e.date >= from) {
        remaining -= event.quantity;
        if remaining < 0.0 {
            return days_between(from, event.date).max(0);
        }
    }
    days_between(from, period_end).max(0)
}

/// The informative / forced-excess path, taken only when the planner
/// found no real need.
fn forced_outcome(
    params: &PlanningParameters,
    events: &[DemandEvent],
    profile: &DemandProfile,
    sizing: &BatchSizing,
    strategy: Strategy,
) -> PlanOutcome {
    if params.force_informative_batches {
        // Zero-effect batch: analytics are computed as if no batch
        // existed at all.
        let batch = informative::informative_batch(params, profile);
        let sim = simulate_batches(
            params.initial_stock,
            params.period_start,
            params.period_end,
            &[],
            events,
        );
        let bundle =
            analytics::assemble(params, events, profile, sizing, strategy, &[], &sim, 0.0);
        info!("emitting informative batch with no analytics effect");
        PlanOutcome {
            batches: vec![batch],
            analytics: bundle,
        }
    } else {
        let batches = vec![informative::excess_batch(params, profile, events)];
        let sim = simulate_batches(
            params.initial_stock,
            params.period_start,
            params.period_end,
            &batches,
            events,
        );
        let bundle =
            analytics::assemble(params, events, profile, sizing, strategy, &batches, &sim, 0.0);
        info!("emitting forced excess batch");
        PlanOutcome {
            batches,
            analytics: bundle,
        }
    }
}
