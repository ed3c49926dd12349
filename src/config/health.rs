//! Health classification configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Thresholds driving connection quality classification
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Seconds without activity before an open connection is considered stale
    #[serde(default = "default_staleness_secs")]
    pub staleness_secs: u64,

    /// Seconds of error-free open connection required for Excellent quality
    #[serde(default = "default_stability_window_secs")]
    pub stability_window_secs: u64,

    /// Error count at which quality degrades to Poor
    #[serde(default = "default_poor_error_threshold")]
    pub poor_error_threshold: u32,
}

impl HealthConfig {
    /// Get the staleness threshold as a Duration
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.staleness_secs)
    }

    /// Get the stability window as a Duration
    pub fn stability_window(&self) -> Duration {
        Duration::from_secs(self.stability_window_secs)
    }

    /// Validate health configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.staleness_secs == 0 {
            return Err(ValidationError::InvalidStalenessThreshold);
        }
        if self.stability_window_secs < self.staleness_secs {
            return Err(ValidationError::InvalidStabilityWindow);
        }
        if self.poor_error_threshold == 0 {
            return Err(ValidationError::InvalidErrorThreshold);
        }
        Ok(())
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            staleness_secs: default_staleness_secs(),
            stability_window_secs: default_stability_window_secs(),
            poor_error_threshold: default_poor_error_threshold(),
        }
    }
}

fn default_staleness_secs() -> u64 {
    30
}

fn default_stability_window_secs() -> u64 {
    120
}

fn default_poor_error_threshold() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_defaults() {
        let config = HealthConfig::default();
        assert_eq!(config.staleness(), Duration::from_secs(30));
        assert_eq!(config.stability_window(), Duration::from_secs(120));
        assert_eq!(config.poor_error_threshold, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_staleness_rejected() {
        let config = HealthConfig {
            staleness_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStalenessThreshold)
        ));
    }

    #[test]
    fn test_stability_window_below_staleness_rejected() {
        let config = HealthConfig {
            staleness_secs: 60,
            stability_window_secs: 30,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStabilityWindow)
        ));
    }

    #[test]
    fn test_zero_error_threshold_rejected() {
        let config = HealthConfig {
            poor_error_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidErrorThreshold)
        ));
    }
}
