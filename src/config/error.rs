//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Backoff base delay must be greater than zero")]
    InvalidBackoffBase,

    #[error("Backoff factor must be at least 1.0")]
    InvalidBackoffFactor,

    #[error("Backoff cap must be at least the base delay")]
    InvalidBackoffCap,

    #[error("Staleness threshold must be greater than zero")]
    InvalidStalenessThreshold,

    #[error("Stability window must be at least the staleness threshold")]
    InvalidStabilityWindow,

    #[error("Poor-quality error threshold must be at least 1")]
    InvalidErrorThreshold,

    #[error("Channel buffer sizes must be greater than zero")]
    InvalidBufferSize,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,
}
