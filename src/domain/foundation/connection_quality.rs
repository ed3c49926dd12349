//! Connection quality classification.

use serde::{Deserialize, Serialize};

/// Health classification of a channel connection.
///
/// Variants are declared worst-first so the derived ordering ranks
/// `Disconnected < Poor < Fair < Good < Excellent`; aggregations that must
/// favor the worse classification can use `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionQuality {
    /// Channel is closed or errored with no successful reconnect since.
    Disconnected,

    /// Repeated transport errors in the current session window.
    Poor,

    /// Occasional errors, a connection still being established, or an open
    /// connection with stale activity.
    Fair,

    /// Open, error-free, with recent activity.
    Good,

    /// Good conditions held continuously for the stability window.
    Excellent,
}

impl ConnectionQuality {
    /// Check whether this quality counts as healthy for consumers.
    pub fn is_healthy(&self) -> bool {
        matches!(self, ConnectionQuality::Good | ConnectionQuality::Excellent)
    }

    /// Returns the worse of two classifications.
    pub fn worst(self, other: ConnectionQuality) -> ConnectionQuality {
        self.min(other)
    }
}

impl std::fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionQuality::Disconnected => "disconnected",
            ConnectionQuality::Poor => "poor",
            ConnectionQuality::Fair => "fair",
            ConnectionQuality::Good => "good",
            ConnectionQuality::Excellent => "excellent",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_ranks_worst_first() {
        assert!(ConnectionQuality::Disconnected < ConnectionQuality::Poor);
        assert!(ConnectionQuality::Poor < ConnectionQuality::Fair);
        assert!(ConnectionQuality::Fair < ConnectionQuality::Good);
        assert!(ConnectionQuality::Good < ConnectionQuality::Excellent);
    }

    #[test]
    fn worst_favors_the_lower_classification() {
        assert_eq!(
            ConnectionQuality::Excellent.worst(ConnectionQuality::Poor),
            ConnectionQuality::Poor
        );
        assert_eq!(
            ConnectionQuality::Good.worst(ConnectionQuality::Good),
            ConnectionQuality::Good
        );
    }

    #[test]
    fn only_good_and_excellent_are_healthy() {
        assert!(ConnectionQuality::Good.is_healthy());
        assert!(ConnectionQuality::Excellent.is_healthy());
        assert!(!ConnectionQuality::Fair.is_healthy());
        assert!(!ConnectionQuality::Poor.is_healthy());
        assert!(!ConnectionQuality::Disconnected.is_healthy());
    }
}
