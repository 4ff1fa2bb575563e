pub mod calendar;
pub mod config;
pub mod error;

pub use calendar::{add_days, date_range, days_between, month_key, parse_date, period_days};
pub use config::{HostConfig, LogConfig, OutputConfig};
pub use error::{Error, ErrorCode, ErrorSeverity, Result};

// Re-export commonly used types from dependencies
pub use chrono::NaiveDate;
