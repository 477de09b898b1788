//! Configuration for the risk engine.
//!
//! Loads a YAML file, substitutes `${VAR}` / `${VAR:-default}` references
//! from the environment, and validates the result. Every section is
//! optional; an empty document yields the defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use risk_engine::config::load_config;
//!
//! // Load from default path (risk-engine.yaml)
//! let config = load_config(None)?;
//!
//! println!("iterations: {}", config.metric.iterations);
//! ```
//!
//! # Example file
//!
//! ```yaml
//! pool:
//!   core_threads: 0          # 0 = logical processors
//!   queue_capacity: 1000
//!   shutdown_grace_secs: 60
//! metric:
//!   iterations: 100000
//!   seed: ${RISK_SEED:-42}
//! logging:
//!   level: info
//!   format: json
//! ```

mod metric;
mod observability;
mod pool;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use metric::MetricSettings;
pub use observability::{LogFormat, LoggingConfig};
pub use pool::PoolSettings;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "risk-engine.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dedicated worker pool settings.
    #[serde(default)]
    pub pool: PoolSettings,
    /// Metric function settings.
    #[serde(default)]
    pub metric: MetricSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Defaults with the pool set up as a bounded task executor.
    #[must_use]
    pub fn task_executor() -> Self {
        Self {
            pool: PoolSettings::task_executor(),
            ..Self::default()
        }
    }
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<EngineConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: EngineConfig = if interpolated.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Substitute `${VAR}` and `${VAR:-default}` references.
///
/// Unset or empty variables take the default, or become empty without one.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &regex::Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.metric.iterations == 0 {
        return Err(ConfigError::ValidationError(
            "metric.iterations must be positive".to_string(),
        ));
    }

    let pool = &config.pool;
    if pool.core_threads > 0 && pool.max_threads > 0 && pool.max_threads < pool.core_threads {
        return Err(ConfigError::ValidationError(
            "pool.max_threads must be >= pool.core_threads".to_string(),
        ));
    }

    if pool.queue_capacity == Some(0) {
        return Err(ConfigError::ValidationError(
            "pool.queue_capacity must be positive when set".to_string(),
        ));
    }

    if pool.shutdown_grace_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pool.shutdown_grace_secs must be positive".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "logging.level must be one of: {valid_levels:?}"
        )));
    }

    Ok(())
}
