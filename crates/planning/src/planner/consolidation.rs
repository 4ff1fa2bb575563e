//! # Batch Consolidation (Phase D)
//!
//! Adjacent candidate batches merge when one of six rules accepts the
//! pair. Each decision records the rule that fired plus the economics
//! behind it, so batch analytics can explain every merge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::demand::DemandProfile;
use crate::model::{ConsolidationQuality, PlanningParameters};
use crate::planner::CandidateBatch;
use crate::sizing::BatchSizing;
use mrp_core::calendar::days_between;

/// Which acceptance rule merged a pair of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationRule {
    /// Net benefit clears the configured minimum.
    BenefitThreshold,
    /// Net benefit is positive.
    PositiveNetBenefit,
    /// The pair overlaps within one lead time and forced consolidation
    /// is on, with bounded holding increase.
    LeadTimeOverlap,
    /// Arrivals at most 7 days apart with holding under 1.2 setups.
    ShortGap,
    /// Small batches at most 14 days apart.
    SmallBatches,
    /// Cheap setups and a gap of at most 21 days.
    CheapSetup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationDecision {
    pub rule: Option<ConsolidationRule>,
    pub gap_days: i64,
    pub setup_savings: f64,
    pub operational_benefits: f64,
    pub holding_cost_increase: f64,
    pub net_benefit: f64,
}

impl ConsolidationDecision {
    pub fn accepted(&self) -> bool {
        self.rule.is_some()
    }
}

/// Totals accumulated on a batch across its merges.
#[derive(Debug, Clone, Default)]
pub struct ConsolidationSummary {
    pub merged_pairs: usize,
    pub net_savings: f64,
    pub holding_cost_increase: f64,
    pub rules: Vec<ConsolidationRule>,
}

impl ConsolidationSummary {
    pub fn quality(&self, setup_cost: f64) -> ConsolidationQuality {
        if self.net_savings > setup_cost {
            ConsolidationQuality::High
        } else if self.net_savings > 0.0 {
            ConsolidationQuality::Medium
        } else {
            ConsolidationQuality::Low
        }
    }
}

/// Evaluate merging `later` into `earlier` (arrival order).
pub fn evaluate_pair(
    earlier: &CandidateBatch,
    later: &CandidateBatch,
    params: &PlanningParameters,
    profile: &DemandProfile,
    sizing: &BatchSizing,
) -> ConsolidationDecision {
    let gap_days = days_between(earlier.arrival_date, later.arrival_date).max(0);
    let setup_savings = params.setup_cost;

    let within_leadtime = gap_days <= params.leadtime_days;
    let mut operational_benefits = 0.0;
    if within_leadtime {
        operational_benefits += 0.5 * params.setup_cost;
        if params.overlap_prevention_priority {
            operational_benefits += params.min_consolidation_benefit;
        }
    }
    if gap_days <= 14 {
        operational_benefits += 0.2 * params.setup_cost;
    }
    let combined_quantity = earlier.quantity + later.quantity;
    if combined_quantity >= 1.5 * sizing.min_batch {
        operational_benefits += 0.1 * params.setup_cost;
    }
    operational_benefits *= params.operational_efficiency_weight;

    // Moving the later quantity earlier holds it in stock for the gap.
    let holding_cost_increase = later.quantity * sizing.daily_holding_cost * gap_days as f64;
    let net_benefit = setup_savings + operational_benefits - holding_cost_increase;

    // Both quantities comfortably below the typical event size.
    let both_small =
        earlier.quantity < 1.5 * profile.mean && later.quantity < 1.5 * profile.mean;

    let rule = if net_benefit >= params.min_consolidation_benefit {
        Some(ConsolidationRule::BenefitThreshold)
    } else if net_benefit > 0.0 {
        Some(ConsolidationRule::PositiveNetBenefit)
    } else if within_leadtime
        && params.force_consolidation_within_leadtime
        && holding_cost_increase < 1.5 * params.setup_cost
    {
        Some(ConsolidationRule::LeadTimeOverlap)
    } else if gap_days <= 7 && holding_cost_increase < 1.2 * params.setup_cost {
        Some(ConsolidationRule::ShortGap)
    } else if gap_days <= 14
        && both_small
        && holding_cost_increase < 2.0 * params.min_consolidation_benefit
    {
        Some(ConsolidationRule::SmallBatches)
    } else if params.setup_cost < 100.0 && gap_days <= 21 && holding_cost_increase < 200.0 {
        Some(ConsolidationRule::CheapSetup)
    } else {
        None
    };

    ConsolidationDecision {
        rule,
        gap_days,
        setup_savings,
        operational_benefits,
        holding_cost_increase,
        net_benefit,
    }
}

/// Merge adjacent candidates until no pair is accepted. The earlier
/// batch keeps its schedule; quantities, covered demands and decision
/// economics accumulate onto it.
pub fn consolidate(
    candidates: &mut Vec<CandidateBatch>,
    params: &PlanningParameters,
    profile: &DemandProfile,
    sizing: &BatchSizing,
) {
    loop {
        let mut merged_any = false;
        let mut index = 0;
        while index + 1 < candidates.len() {
            let decision =
                evaluate_pair(&candidates[index], &candidates[index + 1], params, profile, sizing);
            if decision.accepted() {
                let later = candidates.remove(index + 1);
                let earlier = &mut candidates[index];
                debug!(
                    arrival = %earlier.arrival_date,
                    merged_arrival = %later.arrival_date,
                    rule = ?decision.rule,
                    net_benefit = decision.net_benefit,
                    "consolidating batches"
                );
                earlier.absorb(later, &decision);
                if earlier.quantity > sizing.max_batch {
                    earlier.quantity = sizing.max_batch;
                    earlier.capacity_exceeded = true;
                    earlier.is_critical = true;
                }
                merged_any = true;
            } else {
                index += 1;
            }
        }
        if !merged_any {
            break;
        }
    }
}
