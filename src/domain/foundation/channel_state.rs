//! Lifecycle state of a channel's underlying transport connection.

use serde::{Deserialize, Serialize};

/// Connection lifecycle states for a channel entry.
///
/// Transitions: `Connecting → Open → {Reconnecting → Open | Closed}` and
/// `Open → Errored → Reconnecting`. `Closed` is reached only when the last
/// handle for the channel has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    /// Initial transport open is in flight.
    Connecting,

    /// Connection established, messages flowing.
    Open,

    /// Connection lost while consumers remain; a retry is in progress
    /// or scheduled.
    Reconnecting,

    /// Last handle released; connection closed for good.
    Closed,

    /// Transport failed; a backoff retry is pending.
    Errored,
}

impl ChannelState {
    /// Check if the connection is established.
    pub fn is_open(&self) -> bool {
        matches!(self, ChannelState::Open)
    }

    /// Check if the channel should take part in a manual reconnect sweep.
    pub fn is_reconnectable(&self) -> bool {
        matches!(
            self,
            ChannelState::Open | ChannelState::Errored | ChannelState::Reconnecting
        )
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Reconnecting => "reconnecting",
            ChannelState::Closed => "closed",
            ChannelState::Errored => "errored",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_is_open() {
        assert!(ChannelState::Open.is_open());
        assert!(!ChannelState::Connecting.is_open());
        assert!(!ChannelState::Reconnecting.is_open());
        assert!(!ChannelState::Closed.is_open());
        assert!(!ChannelState::Errored.is_open());
    }

    #[test]
    fn reconnectable_states() {
        assert!(ChannelState::Open.is_reconnectable());
        assert!(ChannelState::Errored.is_reconnectable());
        assert!(ChannelState::Reconnecting.is_reconnectable());
        assert!(!ChannelState::Connecting.is_reconnectable());
        assert!(!ChannelState::Closed.is_reconnectable());
    }
}
