use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics::AnalyticsBundle;

/// Planning specific errors
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Validation error: {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("No demand events remain inside the planning period")]
    EmptyDemand,

    #[error("Infeasible window: earliest arrival {start_cutoff} + {leadtime_days} days exceeds end cutoff {end_cutoff}")]
    InfeasibleWindow {
        start_cutoff: NaiveDate,
        end_cutoff: NaiveDate,
        leadtime_days: i64,
        /// Analytics computed over initial stock and demands alone, so the
        /// caller still sees stock evolution and stockouts.
        analytics: Box<AnalyticsBundle>,
    },

    #[error("Core system error: {0}")]
    Core(#[from] mrp_core::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlanningError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlanningError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PlanningError::Internal {
            message: message.into(),
        }
    }

    /// Map onto the workspace error-code taxonomy.
    pub fn code(&self) -> mrp_core::ErrorCode {
        match self {
            PlanningError::ValidationError { .. } | PlanningError::EmptyDemand => {
                mrp_core::ErrorCode::InvalidInput
            }
            PlanningError::InfeasibleWindow { .. } => mrp_core::ErrorCode::InfeasibleWindow,
            PlanningError::Core(err) => err.code,
            PlanningError::Serialization(_) | PlanningError::Internal { .. } => {
                mrp_core::ErrorCode::Internal
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanningError>;
