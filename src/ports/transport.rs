//! ChannelTransport port - Interface to the external pub/sub service.
//!
//! The coordinator never touches a wire protocol directly. It asks the
//! transport to open a logical channel and receives back an exclusive
//! connection handle plus a stream of transport events. The connection is
//! owned by the channel registry and never exposed to consumers; the single
//! mutation point replaces any need for consumer-side locking.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::foundation::{ChannelKey, ChannelMessage};

/// Errors reported by transport implementations.
///
/// These never reach consumers as `Err`; the subscription manager records
/// them on the channel entry and retries with backoff.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Opening the channel failed (network refusal, handshake failure).
    #[error("Failed to open channel '{channel}': {reason}")]
    OpenFailed { channel: String, reason: String },

    /// The transport itself is unusable (bad endpoint, closed client).
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

/// Events emitted by a live channel connection.
#[derive(Debug)]
pub enum TransportEvent {
    /// A message arrived on the channel.
    Message(ChannelMessage),

    /// The connection hit a transport-level error and is no longer usable.
    Error(String),

    /// The remote side closed the connection.
    Closed,
}

/// Result of opening a channel: the exclusive connection handle plus its
/// event stream. The stream ends when the connection dies.
pub struct OpenedChannel {
    /// Handle used to close the connection. Exactly one `close` call is
    /// expected over its lifetime.
    pub connection: Box<dyn ChannelConnection>,

    /// Transport events for this connection.
    pub events: mpsc::Receiver<TransportEvent>,
}

/// A live, exclusively-owned connection to one logical channel.
#[async_trait]
pub trait ChannelConnection: Send + Sync {
    /// Close the connection and release transport-side resources.
    async fn close(&self);
}

/// Port for the external pub/sub transport.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Open a connection to the given logical channel.
    ///
    /// The filter value is the canonical filter the channel key was derived
    /// from; transports that filter server-side forward it, others may
    /// ignore it (the key already encodes it).
    async fn open(
        &self,
        key: &ChannelKey,
        filter: &serde_json::Value,
    ) -> Result<OpenedChannel, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that the traits are object-safe
    #[allow(dead_code)]
    fn assert_transport_object_safe(_: &dyn ChannelTransport) {}

    #[allow(dead_code)]
    fn assert_connection_object_safe(_: &dyn ChannelConnection) {}

    #[test]
    fn transport_error_display_names_the_channel() {
        let err = TransportError::OpenFailed {
            channel: "orders:abc".to_string(),
            reason: "connection refused".to_string(),
        };
        let rendered = format!("{}", err);
        assert!(rendered.contains("orders:abc"));
        assert!(rendered.contains("connection refused"));
    }
}
