//! Channel buffer configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Buffer sizes for channel fan-out and transport event streams
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// Per-channel broadcast buffer for consumer fan-out.
    ///
    /// Larger values handle bursts better but use more memory.
    /// Recommended: 100-256 for typical feed rates.
    #[serde(default = "default_message_buffer")]
    pub message_buffer: usize,

    /// Per-connection transport event buffer
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl ChannelConfig {
    /// Validate channel configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message_buffer == 0 || self.event_buffer == 0 {
            return Err(ValidationError::InvalidBufferSize);
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            message_buffer: default_message_buffer(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_message_buffer() -> usize {
    128
}

fn default_event_buffer() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.message_buffer, 128);
        assert_eq!(config.event_buffer, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = ChannelConfig {
            message_buffer: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBufferSize)
        ));
    }
}
