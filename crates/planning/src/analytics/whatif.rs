//! Canned what-if scenarios. Each uses a closed-form delta so replay
//! stays deterministic without re-running the planner.

use serde::{Deserialize, Serialize};

use crate::analytics::CostAnalysis;
use crate::model::PlanningParameters;
use crate::sizing::BatchSizing;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub name: String,
    pub description: String,
    pub safety_stock_delta: f64,
    pub total_cost_delta: f64,
}

pub fn scenarios(
    params: &PlanningParameters,
    sizing: &BatchSizing,
    costs: &CostAnalysis,
    period_len_days: i64,
) -> Vec<WhatIfScenario> {
    let period_years = period_len_days as f64 / 365.0;
    let holding_per_unit =
        sizing.unit_value_proxy * params.holding_cost_rate * period_years;

    let demand_up = WhatIfScenario {
        name: "demand_plus_20_percent".to_string(),
        description: "Every demand event grows by 20%".to_string(),
        safety_stock_delta: 0.2 * sizing.safety_stock,
        total_cost_delta: 0.2 * (costs.holding_cost + costs.stockout_cost),
    };

    // Safety stock scales with the square root of the lead time.
    let leadtime_factor = 0.5_f64.sqrt() - 1.0;
    let leadtime_safety_delta = sizing.safety_stock * leadtime_factor;
    let leadtime_down = WhatIfScenario {
        name: "leadtime_minus_50_percent".to_string(),
        description: "Supplier lead time halves".to_string(),
        safety_stock_delta: leadtime_safety_delta,
        total_cost_delta: leadtime_safety_delta * holding_per_unit,
    };

    let perfect = WhatIfScenario {
        name: "perfect_forecast".to_string(),
        description: "Demand is known exactly, no buffers needed".to_string(),
        safety_stock_delta: -sizing.safety_stock,
        total_cost_delta: -(costs.stockout_cost + sizing.safety_stock * holding_per_unit),
    };

    vec![demand_up, leadtime_down, perfect]
}
