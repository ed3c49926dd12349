//! Coordinator metrics collection.
//!
//! Lifetime counters for monitoring and debugging; read via snapshots.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Coordinator-level counters (thread-safe).
#[derive(Debug, Default)]
pub struct CoordinatorMetrics {
    /// Transport connections successfully installed
    channels_opened: AtomicU64,

    /// Transport connections closed (teardown, reconnect, or race cleanup)
    channels_closed: AtomicU64,

    /// Reconnection attempts started
    reconnect_attempts: AtomicU64,

    /// Messages fanned out to consumers
    messages_forwarded: AtomicU64,

    /// Subscription handles issued
    handles_issued: AtomicU64,

    /// Subscription handles released
    handles_released: AtomicU64,

    /// Releases that referenced an unknown or already-closed channel
    stale_releases: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc_channels_opened(&self) {
        self.channels_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_channels_closed(&self) {
        self.channels_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_reconnect_attempts(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_messages_forwarded(&self) {
        self.messages_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_handles_issued(&self) {
        self.handles_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_handles_released(&self) {
        self.handles_released.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_stale_releases(&self) {
        self.stale_releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> CoordinatorMetricsSnapshot {
        CoordinatorMetricsSnapshot {
            channels_opened: self.channels_opened.load(Ordering::Relaxed),
            channels_closed: self.channels_closed.load(Ordering::Relaxed),
            reconnect_attempts: self.reconnect_attempts.load(Ordering::Relaxed),
            messages_forwarded: self.messages_forwarded.load(Ordering::Relaxed),
            handles_issued: self.handles_issued.load(Ordering::Relaxed),
            handles_released: self.handles_released.load(Ordering::Relaxed),
            stale_releases: self.stale_releases.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot (serializable).
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorMetricsSnapshot {
    pub channels_opened: u64,
    pub channels_closed: u64,
    pub reconnect_attempts: u64,
    pub messages_forwarded: u64,
    pub handles_issued: u64,
    pub handles_released: u64,
    pub stale_releases: u64,
}
