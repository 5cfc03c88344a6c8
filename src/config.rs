//! # Engine Configuration
//!
//! Deployment parameters for the negotiation engine.
//!
//! Values come from, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. A `.env` file in the working directory, if present
//! 3. `OFFERS_*` environment variables, e.g. `OFFERS_OFFER_TTL_SECS=3600`
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::config::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_offer_ttl_secs(3600)
//!     .with_max_attempts(5);
//! assert!(config.validate().is_ok());
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::concurrency_guard::DEFAULT_MAX_ATTEMPTS;
use crate::domain::services::rules::{
    DEFAULT_FLOOR_RATIO, DEFAULT_MAX_MESSAGE_LENGTH, NegotiationRules,
};
use crate::domain::services::state_machine::{DEFAULT_OFFER_TTL_SECS, OfferStateMachine};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "OFFERS";

/// Longest accepted offer TTL: one year.
const MAX_OFFER_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Default sweep interval: five minutes.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Negotiation engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds an offer stays open after creation or its latest counter.
    pub offer_ttl_secs: u64,
    /// Lowest acceptable amount as a fraction of the listing price.
    pub floor_ratio: Decimal,
    /// Longest accepted message, in characters.
    pub max_message_length: usize,
    /// Read-validate-swap attempts before reporting a conflict.
    pub max_attempts: u32,
    /// Seconds between background expiration sweeps.
    pub sweep_interval_secs: u64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            offer_ttl_secs: DEFAULT_OFFER_TTL_SECS.unsigned_abs(),
            floor_ratio: DEFAULT_FLOOR_RATIO,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `.env` and `OFFERS_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a variable cannot be
    /// parsed or the result fails [`validate`](Self::validate).
    pub fn from_env() -> ApplicationResult<Self> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` on parse or validation failure.
    pub fn from_source(source: config::Environment) -> ApplicationResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ApplicationError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the offer TTL.
    #[must_use]
    pub fn with_offer_ttl_secs(mut self, secs: u64) -> Self {
        self.offer_ttl_secs = secs;
        self
    }

    /// Sets the floor ratio.
    #[must_use]
    pub fn with_floor_ratio(mut self, ratio: Decimal) -> Self {
        self.floor_ratio = ratio;
        self
    }

    /// Sets the maximum message length.
    #[must_use]
    pub fn with_max_message_length(mut self, length: usize) -> Self {
        self.max_message_length = length;
        self
    }

    /// Sets the concurrency retry budget.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the sweep interval.
    #[must_use]
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    /// Enables or disables JSON logs.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first bad value.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.offer_ttl_secs == 0 || self.offer_ttl_secs > MAX_OFFER_TTL_SECS {
            return Err(ApplicationError::configuration(format!(
                "offer_ttl_secs must be between 1 and {MAX_OFFER_TTL_SECS}, got {}",
                self.offer_ttl_secs
            )));
        }
        if self.floor_ratio <= Decimal::ZERO || self.floor_ratio >= Decimal::ONE {
            return Err(ApplicationError::configuration(format!(
                "floor_ratio must be strictly between 0 and 1, got {}",
                self.floor_ratio
            )));
        }
        if self.max_attempts == 0 {
            return Err(ApplicationError::configuration(
                "max_attempts must be at least 1",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ApplicationError::configuration(
                "sweep_interval_secs must be at least 1",
            ));
        }
        Ok(())
    }

    /// Builds the rule set.
    #[must_use]
    pub fn rules(&self) -> NegotiationRules {
        NegotiationRules::new(self.floor_ratio, self.max_message_length)
    }

    /// Builds the state machine.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the configuration is invalid.
    pub fn state_machine(&self) -> ApplicationResult<OfferStateMachine> {
        self.validate()?;
        let ttl = i64::try_from(self.offer_ttl_secs)
            .map_err(|_| ApplicationError::configuration("offer_ttl_secs too large"))?;
        Ok(OfferStateMachine::new(self.rules(), ttl))
    }

    /// Returns the sweep interval.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
