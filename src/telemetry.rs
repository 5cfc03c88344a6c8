//! # Telemetry
//!
//! Tracing subscriber setup for binaries and services embedding the engine.
//!
//! `RUST_LOG` wins over the configured level when set.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::config::EngineConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Builds the log filter from `RUST_LOG`, falling back to `default_level`.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if `default_level` is not a
/// valid filter directive.
pub fn env_filter(default_level: &str) -> ApplicationResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| ApplicationError::configuration(format!("invalid log filter: {e}")))
}

/// Installs the global tracing subscriber.
///
/// JSON output when `config.json_logs` is set, human-readable otherwise.
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if the filter is invalid or a
/// global subscriber is already installed.
pub fn init_tracing(config: &EngineConfig) -> ApplicationResult<()> {
    let filter = env_filter(&config.log_level)?;

    let result = if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| ApplicationError::configuration(format!("tracing init failed: {e}")))?;

    tracing::debug!(
        level = %config.log_level,
        json = config.json_logs,
        "tracing initialized"
    );
    Ok(())
}
