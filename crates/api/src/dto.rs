//! # Request DTOs
//!
//! JSON shapes for external callers. Dates travel as `YYYY-MM-DD`
//! strings and every tuning knob is optional; omitted fields take the
//! engine defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Validate;

use chrono::NaiveDate;
use mrp_core::calendar::parse_date;
use mrp_planning::{PlanningError, PlanningParameters};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanRequest {
    /// `YYYY-MM-DD` -> quantity.
    pub demand: BTreeMap<String, f64>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub initial_stock: f64,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub leadtime_days: i64,

    pub period_start: String,
    pub period_end: String,

    pub start_cutoff: Option<String>,
    pub end_cutoff: Option<String>,

    #[validate(range(min = 0.0))]
    pub safety_margin_percent: Option<f64>,
    #[validate(range(min = 0))]
    pub safety_days: Option<i64>,
    #[validate(range(min = 0.0))]
    pub minimum_stock_percent: Option<f64>,
    #[validate(range(min = 1))]
    pub max_gap_days: Option<i64>,
    #[validate(range(min = 0.0))]
    pub setup_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub holding_cost_rate: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub service_level: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_batch_size: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_batch_size: Option<f64>,
    #[validate(range(min = 0.0))]
    pub stockout_cost_multiplier: Option<f64>,
    pub enable_consolidation: Option<bool>,
    pub enable_eoq_optimization: Option<bool>,
    pub force_consolidation_within_leadtime: Option<bool>,
    #[validate(range(min = 0.0))]
    pub min_consolidation_benefit: Option<f64>,
    #[validate(range(min = 0.0))]
    pub operational_efficiency_weight: Option<f64>,
    pub overlap_prevention_priority: Option<bool>,
    pub exact_quantity_match: Option<bool>,
    pub ignore_safety_stock: Option<bool>,
    pub force_informative_batches: Option<bool>,
    pub force_excess_production: Option<bool>,
    pub auto_calculate_max_batch_size: Option<bool>,
    #[validate(range(min = 0.0))]
    pub max_batch_multiplier: Option<f64>,
}

impl PlanRequest {
    /// Resolve the request into engine inputs, applying defaults for
    /// every omitted knob.
    pub fn into_engine_inputs(
        self,
    ) -> Result<(PlanningParameters, BTreeMap<NaiveDate, f64>), PlanningError> {
        let period_start = parse_field_date(&self.period_start, "period_start")?;
        let period_end = parse_field_date(&self.period_end, "period_end")?;

        let mut params =
            PlanningParameters::new(self.initial_stock, self.leadtime_days, period_start, period_end);

        if let Some(text) = &self.start_cutoff {
            params.start_cutoff = parse_field_date(text, "start_cutoff")?;
        }
        if let Some(text) = &self.end_cutoff {
            params.end_cutoff = parse_field_date(text, "end_cutoff")?;
        }

        if let Some(value) = self.safety_margin_percent {
            params.safety_margin_percent = value;
        }
        if let Some(value) = self.safety_days {
            params.safety_days = value;
        }
        if let Some(value) = self.minimum_stock_percent {
            params.minimum_stock_percent = value;
        }
        if let Some(value) = self.max_gap_days {
            params.max_gap_days = value;
        }
        if let Some(value) = self.setup_cost {
            params.setup_cost = value;
        }
        if let Some(value) = self.holding_cost_rate {
            params.holding_cost_rate = value;
        }
        if let Some(value) = self.service_level {
            params.service_level = value;
        }
        if let Some(value) = self.min_batch_size {
            params.min_batch_size = value;
        }
        if let Some(value) = self.max_batch_size {
            params.max_batch_size = Some(value);
        }
        if let Some(value) = self.stockout_cost_multiplier {
            params.stockout_cost_multiplier = value;
        }
        if let Some(value) = self.enable_consolidation {
            params.enable_consolidation = value;
        }
        if let Some(value) = self.enable_eoq_optimization {
            params.enable_eoq_optimization = value;
        }
        if let Some(value) = self.force_consolidation_within_leadtime {
            params.force_consolidation_within_leadtime = value;
        }
        if let Some(value) = self.min_consolidation_benefit {
            params.min_consolidation_benefit = value;
        }
        if let Some(value) = self.operational_efficiency_weight {
            params.operational_efficiency_weight = value;
        }
        if let Some(value) = self.overlap_prevention_priority {
            params.overlap_prevention_priority = value;
        }
        if let Some(value) = self.exact_quantity_match {
            params.exact_quantity_match = value;
        }
        if let Some(value) = self.ignore_safety_stock {
            params.ignore_safety_stock = value;
        }
        if let Some(value) = self.force_informative_batches {
            params.force_informative_batches = value;
        }
        if let Some(value) = self.force_excess_production {
            params.force_excess_production = value;
        }
        if let Some(value) = self.auto_calculate_max_batch_size {
            params.auto_calculate_max_batch_size = value;
        }
        if let Some(value) = self.max_batch_multiplier {
            params.max_batch_multiplier = value;
        }

        let mut demand = BTreeMap::new();
        for (date_text, quantity) in self.demand {
            let date = parse_field_date(&date_text, "demand")?;
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(PlanningError::validation(
                    "demand",
                    format!("quantity for {} must be a non-negative number", date_text),
                ));
            }
            *demand.entry(date).or_insert(0.0) += quantity;
        }

        Ok((params, demand))
    }
}

fn parse_field_date(text: &str, field: &str) -> Result<NaiveDate, PlanningError> {
    parse_date(text).map_err(|_| {
        PlanningError::validation(field, format!("'{}' is not a valid YYYY-MM-DD date", text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "demand": {"2025-01-10": 100.0},
            "period_start": "2025-01-01",
            "period_end": "2025-01-31"
        })
    }

    #[test]
    fn test_minimal_request_uses_defaults() {
        let request: PlanRequest = serde_json::from_value(minimal_json()).unwrap();
        request.validate().unwrap();
        let (params, demand) = request.into_engine_inputs().unwrap();
        assert_eq!(params.initial_stock, 0.0);
        assert_eq!(params.safety_margin_percent, 8.0);
        assert_eq!(params.start_cutoff, params.period_start);
        assert_eq!(demand.len(), 1);
    }

    #[test]
    fn test_overrides_are_applied() {
        let mut json = minimal_json();
        json["leadtime_days"] = 20.into();
        json["setup_cost"] = 250.0.into();
        json["exact_quantity_match"] = true.into();
        json["start_cutoff"] = "2024-12-01".into();
        let request: PlanRequest = serde_json::from_value(json).unwrap();
        let (params, _) = request.into_engine_inputs().unwrap();
        assert_eq!(params.leadtime_days, 20);
        assert_eq!(params.setup_cost, 250.0);
        assert!(params.exact_quantity_match);
        assert_eq!(params.start_cutoff, "2024-12-01".parse().unwrap());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let mut json = minimal_json();
        json["period_start"] = "01/01/2025".into();
        let request: PlanRequest = serde_json::from_value(json).unwrap();
        assert!(request.into_engine_inputs().is_err());
    }

    #[test]
    fn test_bad_demand_date_is_rejected() {
        let json = serde_json::json!({
            "demand": {"not-a-date": 10.0},
            "period_start": "2025-01-01",
            "period_end": "2025-01-31"
        });
        let request: PlanRequest = serde_json::from_value(json).unwrap();
        assert!(request.into_engine_inputs().is_err());
    }

    #[test]
    fn test_validator_bounds() {
        let mut json = minimal_json();
        json["initial_stock"] = (-5.0).into();
        let request: PlanRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().is_err());
    }
}
