//! # Request/Response Shim
//!
//! Transport-agnostic boundary: raw JSON in, shaped JSON out. Callers
//! always receive an object; `error: true` marks failures, and the
//! infeasible-window case still carries the analytics computed over
//! initial stock and demands.

use serde_json::{json, Value};
use tracing::{error, warn};
use validator::Validate;

use crate::dto::PlanRequest;
use mrp_core::ErrorCode;
use mrp_planning::{PlanningEngine, PlanningError};

#[derive(Debug, Clone)]
pub struct ShimResponse {
    pub body: Value,
    pub exit_code: i32,
}

impl ShimResponse {
    pub fn is_error(&self) -> bool {
        self.exit_code != 0
    }
}

/// Run one planning call from raw request JSON.
pub fn handle_plan_request(raw: &str) -> ShimResponse {
    let request: PlanRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(parse_error) => {
            warn!(%parse_error, "rejecting malformed request body");
            return error_response(
                format!("Invalid request: {}", parse_error),
                json!({}),
                ErrorCode::InvalidInput.exit_code(),
            );
        }
    };

    if let Err(validation_errors) = request.validate() {
        warn!(%validation_errors, "rejecting request on field validation");
        return error_response(
            format!("Invalid request: {}", validation_errors),
            json!({}),
            ErrorCode::InvalidInput.exit_code(),
        );
    }

    let (params, demand) = match request.into_engine_inputs() {
        Ok(inputs) => inputs,
        Err(planning_error) => return planning_error_response(planning_error),
    };

    match PlanningEngine::new().plan(&params, &demand) {
        Ok(outcome) => match serde_json::to_value(&outcome) {
            Ok(body) => ShimResponse { body, exit_code: 0 },
            Err(serialize_error) => {
                error!(%serialize_error, "failed to serialize plan outcome");
                error_response(
                    "Internal error: response serialization failed".to_string(),
                    json!({}),
                    ErrorCode::Internal.exit_code(),
                )
            }
        },
        Err(planning_error) => planning_error_response(planning_error),
    }
}

fn planning_error_response(planning_error: PlanningError) -> ShimResponse {
    let code = planning_error.code();
    if code == ErrorCode::Internal {
        error!(%planning_error, "planning failed unexpectedly");
    } else {
        warn!(%planning_error, "planning rejected the request");
    }

    // The infeasible window still reports stock evolution and stockouts.
    let partial_analytics = match &planning_error {
        PlanningError::InfeasibleWindow { analytics, .. } => {
            serde_json::to_value(analytics.as_ref()).unwrap_or_else(|_| json!({}))
        }
        _ => json!({}),
    };

    error_response(planning_error.to_string(), partial_analytics, code.exit_code())
}

fn error_response(message: String, partial_analytics: Value, exit_code: i32) -> ShimResponse {
    ShimResponse {
        body: json!({
            "error": true,
            "message": message,
            "batches": [],
            "analytics": partial_analytics,
        }),
        exit_code,
    }
}
