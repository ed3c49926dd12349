//! Reconnection backoff configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Exponential backoff policy for channel reconnection
#[derive(Debug, Clone, Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Multiplier applied per failed attempt
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Upper bound on the retry delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl BackoffConfig {
    /// Get the base delay as a Duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Get the delay cap as a Duration
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Validate backoff configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_delay_ms == 0 {
            return Err(ValidationError::InvalidBackoffBase);
        }
        if self.factor < 1.0 {
            return Err(ValidationError::InvalidBackoffFactor);
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err(ValidationError::InvalidBackoffCap);
        }
        Ok(())
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            factor: default_factor(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_factor() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}
