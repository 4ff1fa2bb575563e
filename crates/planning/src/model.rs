//! # Planning Data Models
//!
//! Core data structures for sporadic-demand replenishment planning:
//! demand events, batches with their per-batch analytics, and the full
//! parameter set of a single planning call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PlanningError, Result};
use mrp_core::calendar::{add_days, period_days};

/// A dated demand event. After normalization there is exactly one entry
/// per date and every quantity is positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandEvent {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// A planned replenishment batch: order on `order_date`, arrive
/// `leadtime_days` later, deliver `quantity` units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub order_date: NaiveDate,
    pub arrival_date: NaiveDate,
    pub quantity: f64,
    pub analytics: BatchAnalytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Critical, // Arrives at or after the demand it covers
    High,     // Arrives with less margin than the configured safety days
    Normal,   // Arrives with standard margin
    Planned,  // Arrives comfortably ahead
    Jit,      // Zero lead time, ordered on the demand day
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsolidationQuality {
    High,   // Net savings above one full setup cost
    Medium, // Positive net savings
    Low,    // Merged on an operational rule despite negative net savings
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Descriptive analytics attached to every emitted batch.
///
/// Optional fields only appear in serialized output when the related
/// planning path ran (consolidation, long-lead-time coverage, forced
/// informative/excess generation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalytics {
    pub stock_before_arrival: f64,
    pub stock_after_arrival: f64,
    pub consumption_since_last_arrival: f64,
    pub coverage_days: i64,
    pub actual_lead_time: i64,
    pub urgency_level: UrgencyLevel,
    pub is_critical: bool,
    pub demands_covered: Vec<DemandEvent>,
    pub shortfall_covered: f64,
    pub efficiency_ratio: f64,
    pub safety_margin_days: i64,
    pub consolidated_group: bool,
    pub group_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consolidation_quality: Option<ConsolidationQuality>,
    pub net_savings: f64,
    pub holding_cost_increase: f64,
    pub overlap_prevented: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_delay_days: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub long_leadtime_optimization: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future_demand_considered: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_window_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_to_next_demand: Option<i64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub informative_batch: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub excess_production: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_need: Option<String>,
}

impl Default for BatchAnalytics {
    fn default() -> Self {
        Self {
            stock_before_arrival: 0.0,
            stock_after_arrival: 0.0,
            consumption_since_last_arrival: 0.0,
            coverage_days: 0,
            actual_lead_time: 0,
            urgency_level: UrgencyLevel::Planned,
            is_critical: false,
            demands_covered: Vec::new(),
            shortfall_covered: 0.0,
            efficiency_ratio: 0.0,
            safety_margin_days: 0,
            consolidated_group: false,
            group_size: 1,
            consolidation_quality: None,
            net_savings: 0.0,
            holding_cost_increase: 0.0,
            overlap_prevented: false,
            arrival_delay_days: None,
            long_leadtime_optimization: false,
            future_demand_considered: None,
            coverage_window_days: None,
            gap_to_next_demand: None,
            informative_batch: false,
            excess_production: false,
            actual_need: None,
        }
    }
}

/// Inputs to a single planning call. Defaults match the documented
/// operational baseline; dates have no defaults and come from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningParameters {
    pub initial_stock: f64,
    pub leadtime_days: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub start_cutoff: NaiveDate,
    pub end_cutoff: NaiveDate,
    pub safety_margin_percent: f64,
    pub safety_days: i64,
    pub minimum_stock_percent: f64,
    pub max_gap_days: i64,
    pub setup_cost: f64,
    pub holding_cost_rate: f64,
    pub service_level: f64,
    pub min_batch_size: f64,
    pub max_batch_size: Option<f64>,
    pub stockout_cost_multiplier: f64,
    pub enable_consolidation: bool,
    pub enable_eoq_optimization: bool,
    pub force_consolidation_within_leadtime: bool,
    pub min_consolidation_benefit: f64,
    pub operational_efficiency_weight: f64,
    pub overlap_prevention_priority: bool,
    pub exact_quantity_match: bool,
    pub ignore_safety_stock: bool,
    pub force_informative_batches: bool,
    pub force_excess_production: bool,
    pub auto_calculate_max_batch_size: bool,
    pub max_batch_multiplier: f64,
}

impl PlanningParameters {
    /// Baseline parameters for a period; cutoffs default to the period
    /// bounds.
    pub fn new(
        initial_stock: f64,
        leadtime_days: i64,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self {
            initial_stock,
            leadtime_days,
            period_start,
            period_end,
            start_cutoff: period_start,
            end_cutoff: period_end,
            safety_margin_percent: 8.0,
            safety_days: 2,
            minimum_stock_percent: 0.0,
            max_gap_days: 999,
            setup_cost: 150.0,
            holding_cost_rate: 0.2,
            service_level: 0.95,
            min_batch_size: 1.0,
            max_batch_size: None,
            stockout_cost_multiplier: 2.5,
            enable_consolidation: true,
            enable_eoq_optimization: true,
            force_consolidation_within_leadtime: true,
            min_consolidation_benefit: 50.0,
            operational_efficiency_weight: 1.0,
            overlap_prevention_priority: false,
            exact_quantity_match: false,
            ignore_safety_stock: false,
            force_informative_batches: false,
            force_excess_production: false,
            auto_calculate_max_batch_size: true,
            max_batch_multiplier: 2.0,
        }
    }

    pub fn period_length_days(&self) -> i64 {
        period_days(self.period_start, self.period_end)
    }

    /// An order placed at the earliest cutoff must still arrive by the
    /// latest cutoff.
    pub fn window_is_feasible(&self) -> bool {
        add_days(self.start_cutoff, self.leadtime_days) <= self.end_cutoff
    }

    pub fn wants_forced_output(&self) -> bool {
        self.force_informative_batches || self.force_excess_production
    }

    /// Structural validation of a single call's inputs.
    pub fn validate(&self) -> Result<()> {
        if self.period_start > self.period_end {
            return Err(PlanningError::validation(
                "period_start",
                format!(
                    "period_start {} is after period_end {}",
                    self.period_start, self.period_end
                ),
            ));
        }
        if self.start_cutoff > self.end_cutoff {
            return Err(PlanningError::validation(
                "start_cutoff",
                format!(
                    "start_cutoff {} is after end_cutoff {}",
                    self.start_cutoff, self.end_cutoff
                ),
            ));
        }
        let non_negative = [
            ("initial_stock", self.initial_stock),
            ("safety_margin_percent", self.safety_margin_percent),
            ("minimum_stock_percent", self.minimum_stock_percent),
            ("setup_cost", self.setup_cost),
            ("holding_cost_rate", self.holding_cost_rate),
            ("min_batch_size", self.min_batch_size),
            ("stockout_cost_multiplier", self.stockout_cost_multiplier),
            ("operational_efficiency_weight", self.operational_efficiency_weight),
            ("min_consolidation_benefit", self.min_consolidation_benefit),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(PlanningError::validation(
                    field,
                    format!("must be a non-negative finite number, got {}", value),
                ));
            }
        }
        if self.leadtime_days < 0 {
            return Err(PlanningError::validation(
                "leadtime_days",
                format!("must be >= 0, got {}", self.leadtime_days),
            ));
        }
        if self.safety_days < 0 {
            return Err(PlanningError::validation(
                "safety_days",
                format!("must be >= 0, got {}", self.safety_days),
            ));
        }
        if self.max_gap_days < 1 {
            return Err(PlanningError::validation(
                "max_gap_days",
                format!("must be >= 1, got {}", self.max_gap_days),
            ));
        }
        if self.service_level <= 0.0 || self.service_level >= 1.0 {
            return Err(PlanningError::validation(
                "service_level",
                format!("must be in (0, 1), got {}", self.service_level),
            ));
        }
        if let Some(max_batch) = self.max_batch_size {
            if max_batch <= 0.0 || !max_batch.is_finite() {
                return Err(PlanningError::validation(
                    "max_batch_size",
                    format!("must be a positive finite number, got {}", max_batch),
                ));
            }
            let effective_min = if self.exact_quantity_match {
                0.0
            } else {
                self.min_batch_size.max(1.0)
            };
            if max_batch < effective_min {
                return Err(PlanningError::validation(
                    "max_batch_size",
                    format!(
                        "must be at least the minimum batch size {}, got {}",
                        effective_min, max_batch
                    ),
                ));
            }
        }
        if self.max_batch_multiplier < 0.0 {
            return Err(PlanningError::validation(
                "max_batch_multiplier",
                format!("must be >= 0, got {}", self.max_batch_multiplier),
            ));
        }
        Ok(())
    }
}

/// Ordered day-by-day stock levels over the planning period.
pub type StockEvolution = BTreeMap<NaiveDate, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockSeverity {
    Stockout, // Stock below zero
    Critical, // Below one day of mean consumption
    Warning,  // Below two days of mean consumption with short coverage
}

/// A day on which stock dips into a risky band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub date: NaiveDate,
    pub stock: f64,
    pub days_of_coverage: f64,
    pub severity: StockSeverity,
}
