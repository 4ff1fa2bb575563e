//! # Host Configuration
//!
//! Layered configuration for the CLI host, loaded in order of precedence:
//!
//! 1. **Environment variables** prefixed `MRP_` (highest precedence)
//! 2. **Environment-specific TOML file** (e.g. `config/production.toml`)
//! 3. **Built-in defaults** (lowest precedence)
//!
//! The planning engine itself never reads configuration: every planning
//! call carries its full parameter set, so this only governs host concerns
//! such as logging and output shaping.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Host-level settings for the CLI binary.
#[derive(Debug, Deserialize, Clone)]
pub struct HostConfig {
    /// Logging configuration
    pub log: LogConfig,
    /// Output shaping configuration
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `info` or
    /// `mrp_planning=debug`
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Pretty-print the JSON response on stdout
    pub pretty: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log: LogConfig {
                filter: "info".to_string(),
            },
            output: OutputConfig { pretty: false },
        }
    }
}

impl HostConfig {
    /// Load configuration for the environment named by `MRP_ENVIRONMENT`
    /// (default `development`). Missing files are fine; defaults apply.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = env::var("MRP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let loader = ConfigLoader::builder()
            .set_default("log.filter", "info")?
            .set_default("output.pretty", false)?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(Environment::with_prefix("MRP").separator("__"))
            .build()?;

        loader.try_deserialize()
    }
}
