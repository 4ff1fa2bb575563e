// Sporadic-demand replenishment planning engine.
// Pure per call: all state is owned by the call, the only side effect is
// structured logging.

pub mod analytics;
pub mod demand;
pub mod error;
pub mod informative;
pub mod model;
pub mod planner;
pub mod simulation;
pub mod sizing;
pub mod strategy;

// Re-exports for easy access
pub use analytics::{
    AnalyticsBundle, CostAnalysis, DemandMetrics, PerformanceMetrics, PlanSummary,
    RiskAssessment, SeasonalityMarkers, WhatIfScenario,
};
pub use demand::{normalize_demand, profile_demand, DemandProfile};
pub use error::{PlanningError, Result};
pub use model::{
    Batch, BatchAnalytics, ConsolidationQuality, CriticalPoint, DemandEvent, PlanningParameters,
    StockEvolution, StockSeverity, UrgencyLevel,
};
pub use planner::{PlanOutcome, PlanningEngine};
pub use simulation::{simulate_batches, SimulationResult};
pub use sizing::BatchSizing;
pub use strategy::Strategy;
