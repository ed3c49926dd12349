//! Realtime configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `FARMSTAND_` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use farmstand_realtime::config::RealtimeConfig;
//!
//! let config = RealtimeConfig::load().expect("Failed to load configuration");
//!
//! println!("Backoff base delay: {:?}", config.backoff.base_delay());
//! ```

mod backoff;
mod channels;
mod error;
mod features;
mod health;
mod transport;

pub use backoff::BackoffConfig;
pub use channels::ChannelConfig;
pub use error::{ConfigError, ValidationError};
pub use features::DomainFlags;
pub use health::HealthConfig;
pub use transport::TransportConfig;

use serde::Deserialize;

/// Root realtime configuration
///
/// Contains all configuration sections for the realtime coordination layer.
/// Load using [`RealtimeConfig::load()`] which reads from environment
/// variables, or construct via `Default` in tests.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RealtimeConfig {
    /// Reconnection backoff policy
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Health classification thresholds
    #[serde(default)]
    pub health: HealthConfig,

    /// Channel buffer sizes
    #[serde(default)]
    pub channels: ChannelConfig,

    /// Transport endpoint settings (Redis pub/sub)
    #[serde(default)]
    pub transport: TransportConfig,

    /// Per-domain feature flags
    #[serde(default)]
    pub features: DomainFlags,
}

impl RealtimeConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FARMSTAND` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Validates the result
    ///
    /// # Example environment variables
    ///
    /// ```text
    /// FARMSTAND__BACKOFF__BASE_DELAY_MS=1000
    /// FARMSTAND__HEALTH__STALENESS_SECS=30
    /// FARMSTAND__FEATURES__MARKETING=false
    /// FARMSTAND__TRANSPORT__REDIS_URL=redis://localhost:6379
    /// ```
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors - it's optional)
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FARMSTAND")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: RealtimeConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backoff.validate()?;
        self.health.validate()?;
        self.channels.validate()?;
        self.transport.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = RealtimeConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_enables_every_domain() {
        let config = RealtimeConfig::default();
        assert!(config.features.inventory);
        assert!(config.features.marketing);
        assert!(config.features.orders);
    }
}
