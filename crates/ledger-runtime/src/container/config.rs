//! # Runtime Configuration
//!
//! Defaults suit a single local process; every field can be overridden from
//! the environment.

use ledger_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Ledger channel the components are deployed on.
    pub channel_name: String,
    /// Re-simulations allowed after a commit is rejected as stale.
    pub max_commit_retries: u32,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_name: "votingchannel".to_string(),
            max_commit_retries: 3,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// - `EL_CHANNEL`: channel name (default: votingchannel)
    /// - `EL_MAX_COMMIT_RETRIES`: re-simulation bound (default: 3)
    /// - `EL_*` telemetry variables, see [`TelemetryConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(channel) = lookup("EL_CHANNEL") {
            self.channel_name = channel;
        }
        if let Some(value) = lookup("EL_MAX_COMMIT_RETRIES") {
            self.max_commit_retries =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        var: "EL_MAX_COMMIT_RETRIES",
                        value,
                    })?;
        }
        Ok(())
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_name.trim().is_empty() {
            return Err(ConfigError::EmptyChannelName);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("channel name must not be empty")]
    EmptyChannelName,

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
