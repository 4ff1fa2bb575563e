//! # Error Handling Framework
//!
//! Structured error management shared across the workspace. Errors carry a
//! standardized [`ErrorCode`], a human-readable message, optional details,
//! and a severity used to decide logging levels at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Standardized error codes for the planning system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed date, negative numeric, missing required field, or empty
    /// demand without an explicit informative/excess flag.
    InvalidInput,
    /// `start_cutoff + leadtime_days > end_cutoff`: no order can both be
    /// placed and arrive inside the allowed window.
    InfeasibleWindow,
    /// Requested quantity collides with the maximum batch size and cannot
    /// be split before the cutoff. Surfaced in analytics, not as a failure.
    CapacityExceeded,
    /// Unexpected arithmetic or logic failure inside the engine.
    Internal,
}

impl ErrorCode {
    /// Process exit code for the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::InvalidInput | ErrorCode::InfeasibleWindow => 2,
            ErrorCode::CapacityExceeded => 0,
            ErrorCode::Internal => 1,
        }
    }

    pub fn is_caller_fault(&self) -> bool {
        matches!(self, ErrorCode::InvalidInput | ErrorCode::InfeasibleWindow)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::InfeasibleWindow => "infeasible_window",
            ErrorCode::CapacityExceeded => "capacity_exceeded",
            ErrorCode::Internal => "internal",
        };
        f.write_str(text)
    }
}

/// Severity levels for errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Expected rejections of caller input.
    Low,
    /// Degraded output the caller should review.
    Medium,
    /// Defects that require investigation.
    High,
}

/// Main error type for the planning system.
#[derive(Debug, Clone)]
pub struct Error {
    /// Standardized error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional detailed description
    pub details: Option<String>,
    /// Error severity
    pub severity: ErrorSeverity,
}

impl Error {
    /// Create a new error with the default severity for its code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            severity: Self::default_severity_for_code(code),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Attach a detailed description.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn should_log_as_error(&self) -> bool {
        matches!(self.severity, ErrorSeverity::High)
    }

    fn default_severity_for_code(code: ErrorCode) -> ErrorSeverity {
        match code {
            ErrorCode::InvalidInput | ErrorCode::InfeasibleWindow => ErrorSeverity::Low,
            ErrorCode::CapacityExceeded => ErrorSeverity::Medium,
            ErrorCode::Internal => ErrorSeverity::High,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {}: {}", self.code, self.message, details),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for Error {}
