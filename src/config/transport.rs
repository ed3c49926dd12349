//! Transport endpoint configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Settings for the Redis pub/sub transport adapter
///
/// The URL is optional because tests and embedded deployments supply their
/// own transport implementation; when present it must be a Redis URL.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Redis connection URL (`redis://` or `rediss://`)
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl TransportConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate transport configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.redis_url {
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    5
}
