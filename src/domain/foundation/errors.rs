//! Error types for the subscribe boundary.
//!
//! Transport failures are never surfaced here; they degrade the channel's
//! reported quality instead. These errors indicate caller contract
//! violations and are returned synchronously from `subscribe`.

use thiserror::Error;

/// Errors raised for malformed subscribe requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("Channel key cannot be empty")]
    EmptyChannelKey,

    #[error("Channel key '{key}' is malformed")]
    InvalidChannelKey { key: String },

    #[error("Filter for channel '{channel}' must be a JSON object")]
    InvalidFilter { channel: String },
}
