//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies,
//! with this crate pinned to at least `info`.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Error returned when the global subscriber cannot be installed.
#[derive(Debug, thiserror::Error)]
pub enum TracingInitError {
    /// The configured filter directive did not parse.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Offending directive.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns error if the level does not parse or a subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TracingInitError> {
    let filter = build_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    result.map_err(|e| TracingInitError::Install(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, TracingInitError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = format!("{},risk_engine={}", config.level, crate_level(&config.level));
    EnvFilter::try_new(&directive).map_err(|e| TracingInitError::InvalidFilter {
        directive,
        message: e.to_string(),
    })
}

/// Crate logs are kept at `info` unless a more verbose level is configured.
fn crate_level(level: &str) -> &str {
    match level.to_ascii_lowercase().as_str() {
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}
