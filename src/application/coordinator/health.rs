//! Connection health monitor.
//!
//! Translates raw channel state and timing into a classification consumers
//! can act on. The checks form a strict precedence chain - worse
//! classifications are tested first, so ties always resolve toward the
//! worse quality and health is never over-reported.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::HealthConfig;
use crate::domain::foundation::{ChannelState, ConnectionQuality};

use super::registry::ChannelSnapshot;

/// Classifies channel snapshots into connection quality.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    staleness: Duration,
    stability_window: Duration,
    poor_threshold: u32,
}

impl HealthMonitor {
    /// Build a monitor from configuration.
    pub fn new(config: &HealthConfig) -> Self {
        Self {
            staleness: config.staleness(),
            stability_window: config.stability_window(),
            poor_threshold: config.poor_error_threshold,
        }
    }

    /// Classify a channel snapshot.
    ///
    /// Precedence: Disconnected, then Poor, then Fair, then Good/Excellent.
    pub fn classify(&self, snapshot: &ChannelSnapshot) -> ConnectionQuality {
        self.classify_at(snapshot, Instant::now())
    }

    fn classify_at(&self, snapshot: &ChannelSnapshot, now: Instant) -> ConnectionQuality {
        if matches!(
            snapshot.state,
            ChannelState::Closed | ChannelState::Errored
        ) {
            return ConnectionQuality::Disconnected;
        }

        if snapshot.error_count >= self.poor_threshold {
            return ConnectionQuality::Poor;
        }

        if snapshot.error_count > 0 {
            return ConnectionQuality::Fair;
        }

        // Connecting or Reconnecting with a clean error record: the link is
        // not established, so the channel is neither dead nor healthy.
        if !snapshot.state.is_open() {
            return ConnectionQuality::Fair;
        }

        let fresh = now.duration_since(snapshot.last_activity) <= self.staleness;
        if !fresh {
            return ConnectionQuality::Fair;
        }

        if let Some(good_since) = snapshot.good_since {
            if now.duration_since(good_since) >= self.stability_window {
                return ConnectionQuality::Excellent;
            }
        }

        ConnectionQuality::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ChannelKey;

    fn monitor() -> HealthMonitor {
        HealthMonitor::new(&HealthConfig::default())
    }

    fn snapshot(state: ChannelState, error_count: u32, now: Instant) -> ChannelSnapshot {
        ChannelSnapshot {
            key: ChannelKey::new("orders:test").unwrap(),
            ref_count: 1,
            state,
            error_count,
            last_error: None,
            last_activity: now,
            good_since: Some(now),
        }
    }

    #[test]
    fn closed_and_errored_are_disconnected() {
        let now = Instant::now();
        let monitor = monitor();
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Closed, 0, now), now),
            ConnectionQuality::Disconnected
        );
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Errored, 5, now), now),
            ConnectionQuality::Disconnected
        );
    }

    #[test]
    fn repeated_errors_are_poor_regardless_of_state() {
        let now = Instant::now();
        let monitor = monitor();
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Open, 3, now), now),
            ConnectionQuality::Poor
        );
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Reconnecting, 4, now), now),
            ConnectionQuality::Poor
        );
    }

    #[test]
    fn a_few_errors_are_fair() {
        let now = Instant::now();
        let monitor = monitor();
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Open, 1, now), now),
            ConnectionQuality::Fair
        );
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Open, 2, now), now),
            ConnectionQuality::Fair
        );
    }

    #[test]
    fn connecting_without_errors_is_fair() {
        let now = Instant::now();
        let monitor = monitor();
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Connecting, 0, now), now),
            ConnectionQuality::Fair
        );
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Reconnecting, 0, now), now),
            ConnectionQuality::Fair
        );
    }

    #[test]
    fn open_with_stale_activity_is_fair() {
        let now = Instant::now();
        let monitor = monitor();
        let mut snap = snapshot(ChannelState::Open, 0, now);
        snap.last_activity = now - Duration::from_secs(31);
        assert_eq!(monitor.classify_at(&snap, now), ConnectionQuality::Fair);
    }

    #[test]
    fn open_fresh_and_clean_is_good() {
        let now = Instant::now();
        let monitor = monitor();
        assert_eq!(
            monitor.classify_at(&snapshot(ChannelState::Open, 0, now), now),
            ConnectionQuality::Good
        );
    }

    #[test]
    fn sustained_good_becomes_excellent() {
        let now = Instant::now();
        let monitor = monitor();
        let mut snap = snapshot(ChannelState::Open, 0, now);
        snap.good_since = Some(now - Duration::from_secs(121));
        snap.last_activity = now - Duration::from_secs(5);
        assert_eq!(
            monitor.classify_at(&snap, now),
            ConnectionQuality::Excellent
        );
    }

    #[test]
    fn stability_window_only_counts_once_elapsed() {
        let now = Instant::now();
        let monitor = monitor();
        let mut snap = snapshot(ChannelState::Open, 0, now);
        snap.good_since = Some(now - Duration::from_secs(60));
        assert_eq!(monitor.classify_at(&snap, now), ConnectionQuality::Good);
    }

    #[test]
    fn growing_error_count_never_improves_quality() {
        let now = Instant::now();
        let monitor = monitor();
        let mut previous = monitor.classify_at(&snapshot(ChannelState::Open, 0, now), now);
        for errors in 1..=5 {
            let quality = monitor.classify_at(&snapshot(ChannelState::Open, errors, now), now);
            assert!(
                quality <= previous,
                "quality improved from {:?} to {:?} at {} errors",
                previous,
                quality,
                errors
            );
            previous = quality;
        }
    }
}
