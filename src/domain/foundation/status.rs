//! Status snapshot value objects returned to consumers.
//!
//! Every domain facade returns the same [`DomainStatus`] shape, so generic
//! dashboards and error boundaries can treat all domains uniformly. The
//! snapshots are produced fresh on each read and never mutated in place.

use serde::Serialize;

use super::{ChannelState, ConnectionQuality, DomainName};

/// Manager-level health view of a single channel.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelHealth {
    /// Current lifecycle state.
    pub state: ChannelState,

    /// Classified quality (see the health monitor precedence chain).
    pub connection_quality: ConnectionQuality,

    /// Most recent transport error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelHealth {
    /// Health view for a channel with no registry entry.
    pub fn disconnected() -> Self {
        Self {
            state: ChannelState::Closed,
            connection_quality: ConnectionQuality::Disconnected,
            error: None,
        }
    }
}

/// Immutable per-domain status snapshot.
///
/// The field set is identical for every domain; this single shared type is
/// the contract that keeps facade return shapes uniform.
#[derive(Debug, Clone, Serialize)]
pub struct DomainStatus {
    /// Which feature area this status describes.
    pub domain: DomainName,

    /// Whether the domain's realtime feed is enabled by configuration.
    pub is_enabled: bool,

    /// Whether the underlying connection is currently open.
    pub is_connected: bool,

    /// Whether the connection quality is Good or better.
    pub is_healthy: bool,

    /// Classified connection quality.
    pub connection_quality: ConnectionQuality,

    /// Most recent transport error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainStatus {
    /// Status for a domain disabled by feature flag.
    pub fn disabled(domain: DomainName) -> Self {
        Self {
            domain,
            is_enabled: false,
            is_connected: false,
            is_healthy: false,
            connection_quality: ConnectionQuality::Disconnected,
            error: None,
        }
    }

    /// Builds the snapshot for an enabled domain from its channel health.
    pub fn from_health(domain: DomainName, health: &ChannelHealth) -> Self {
        Self {
            domain,
            is_enabled: true,
            is_connected: health.state.is_open(),
            is_healthy: health.connection_quality.is_healthy(),
            connection_quality: health.connection_quality,
            error: health.error.clone(),
        }
    }
}

/// Coordinator-level status combining every registered domain.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedStatus {
    /// Logical AND of `is_healthy` across enabled domains. Disabled domains
    /// are excluded from the AND, not counted as unhealthy.
    pub is_healthy: bool,

    /// The worst connection quality among enabled domains.
    pub connection_quality: ConnectionQuality,

    /// Per-domain snapshots, in registration order.
    pub domains: Vec<DomainStatus>,
}

impl UnifiedStatus {
    /// Aggregates per-domain snapshots into one coordinator-level object.
    ///
    /// With no enabled domains, `is_healthy` is vacuously true and the
    /// aggregate quality reports `Disconnected`.
    pub fn aggregate(domains: Vec<DomainStatus>) -> Self {
        let enabled = domains.iter().filter(|d| d.is_enabled);

        let mut is_healthy = true;
        let mut quality: Option<ConnectionQuality> = None;
        for status in enabled {
            is_healthy = is_healthy && status.is_healthy;
            quality = Some(match quality {
                Some(q) => q.worst(status.connection_quality),
                None => status.connection_quality,
            });
        }

        Self {
            is_healthy,
            connection_quality: quality.unwrap_or(ConnectionQuality::Disconnected),
            domains,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(
        domain: DomainName,
        enabled: bool,
        healthy: bool,
        quality: ConnectionQuality,
    ) -> DomainStatus {
        DomainStatus {
            domain,
            is_enabled: enabled,
            is_connected: healthy,
            is_healthy: healthy,
            connection_quality: quality,
            error: None,
        }
    }

    #[test]
    fn aggregate_ands_enabled_domains_only() {
        let unified = UnifiedStatus::aggregate(vec![
            status(DomainName::Inventory, true, true, ConnectionQuality::Good),
            status(DomainName::Marketing, true, false, ConnectionQuality::Poor),
            status(
                DomainName::Orders,
                false,
                false,
                ConnectionQuality::Disconnected,
            ),
        ]);

        assert!(!unified.is_healthy);
        assert_eq!(unified.connection_quality, ConnectionQuality::Poor);
        assert_eq!(unified.domains.len(), 3);
    }

    #[test]
    fn aggregate_is_healthy_when_all_enabled_are_healthy() {
        let unified = UnifiedStatus::aggregate(vec![
            status(
                DomainName::Inventory,
                true,
                true,
                ConnectionQuality::Excellent,
            ),
            status(DomainName::Orders, true, true, ConnectionQuality::Good),
        ]);

        assert!(unified.is_healthy);
        assert_eq!(unified.connection_quality, ConnectionQuality::Good);
    }

    #[test]
    fn aggregate_with_no_enabled_domains_is_vacuously_healthy() {
        let unified = UnifiedStatus::aggregate(vec![status(
            DomainName::Marketing,
            false,
            false,
            ConnectionQuality::Disconnected,
        )]);

        assert!(unified.is_healthy);
        assert_eq!(
            unified.connection_quality,
            ConnectionQuality::Disconnected
        );
    }

    #[test]
    fn disabled_status_has_uniform_shape() {
        let disabled = DomainStatus::disabled(DomainName::Orders);
        assert!(!disabled.is_enabled);
        assert!(!disabled.is_connected);
        assert!(!disabled.is_healthy);
        assert_eq!(
            disabled.connection_quality,
            ConnectionQuality::Disconnected
        );
    }

    #[test]
    fn from_health_reflects_open_state() {
        let health = ChannelHealth {
            state: ChannelState::Open,
            connection_quality: ConnectionQuality::Good,
            error: None,
        };
        let status = DomainStatus::from_health(DomainName::Inventory, &health);
        assert!(status.is_enabled);
        assert!(status.is_connected);
        assert!(status.is_healthy);
    }

    #[test]
    fn from_health_carries_last_error() {
        let health = ChannelHealth {
            state: ChannelState::Errored,
            connection_quality: ConnectionQuality::Disconnected,
            error: Some("connection refused".to_string()),
        };
        let status = DomainStatus::from_health(DomainName::Orders, &health);
        assert!(!status.is_connected);
        assert!(!status.is_healthy);
        assert_eq!(status.error.as_deref(), Some("connection refused"));
    }
}
