//! Subscription manager - the façade domain facades talk to.
//!
//! Wraps the channel registry and health monitor, owns the transport port,
//! and implements the reconnection policy. Consumers get back an opaque
//! [`SubscriptionHandle`]; connection establishment, teardown, and retries
//! all happen on spawned tasks and are observed through `status`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::RealtimeConfig;
use crate::domain::foundation::{ChannelHealth, ChannelKey, ChannelState, SubscribeError};
use crate::ports::{ChannelTransport, TransportEvent};

use super::backoff::BackoffSchedule;
use super::handle::SubscriptionHandle;
use super::health::HealthMonitor;
use super::metrics::{CoordinatorMetrics, CoordinatorMetricsSnapshot};
use super::registry::{
    AcquireOutcome, ChannelEntry, ChannelRegistry, ChannelSnapshot, InstallOutcome,
};

/// Coordinates all realtime subscriptions of one client process.
///
/// Construct one instance at application start and hand clones to every
/// facade; the manager is an explicit dependency, never a global. Multiple
/// independent instances may coexist (each test gets its own).
///
/// All operations require a running tokio runtime, since connection work
/// happens on spawned tasks.
#[derive(Clone)]
pub struct SubscriptionManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    registry: Arc<ChannelRegistry>,
    transport: Arc<dyn ChannelTransport>,
    health: HealthMonitor,
    backoff: BackoffSchedule,
    metrics: Arc<CoordinatorMetrics>,
}

impl SubscriptionManager {
    /// Create a manager over the given transport.
    pub fn new(config: &RealtimeConfig, transport: Arc<dyn ChannelTransport>) -> Self {
        let metrics = Arc::new(CoordinatorMetrics::new());
        let registry = Arc::new(ChannelRegistry::new(
            config.channels.message_buffer,
            Arc::clone(&metrics),
        ));
        Self {
            inner: Arc::new(ManagerInner {
                registry,
                transport,
                health: HealthMonitor::new(&config.health),
                backoff: BackoffSchedule::new(&config.backoff),
                metrics,
            }),
        }
    }

    /// Subscribe to a logical channel.
    ///
    /// Returns synchronously with a handle; the transport open proceeds on
    /// a spawned task and its outcome is observed via [`status`](Self::status).
    /// Fails only on caller contract violations (a filter that is not a
    /// JSON object); transport failures surface through degraded status,
    /// never as an `Err` here.
    pub fn subscribe(
        &self,
        key: ChannelKey,
        filter: serde_json::Value,
    ) -> Result<SubscriptionHandle, SubscribeError> {
        if !filter.is_object() {
            return Err(SubscribeError::InvalidFilter {
                channel: key.to_string(),
            });
        }

        let (handle, outcome, entry) = self.inner.registry.acquire(key, filter);
        if outcome == AcquireOutcome::Created {
            ManagerInner::spawn_open(Arc::clone(&self.inner), entry);
        }
        Ok(handle)
    }

    /// Release a subscription handle.
    ///
    /// Equivalent to dropping the handle; the last release for a channel
    /// closes its connection and cancels any pending reconnect timer within
    /// this call.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        handle.release();
    }

    /// Current health view of a channel, classified fresh on every read.
    pub fn status(&self, key: &ChannelKey) -> ChannelHealth {
        match self.inner.registry.get(key) {
            Some(entry) => {
                let snapshot = entry.snapshot();
                ChannelHealth {
                    state: snapshot.state,
                    connection_quality: self.inner.health.classify(&snapshot),
                    error: snapshot.last_error,
                }
            }
            None => ChannelHealth::disconnected(),
        }
    }

    /// Raw bookkeeping snapshot for a channel (monitoring/debugging).
    pub fn channel_snapshot(&self, key: &ChannelKey) -> Option<ChannelSnapshot> {
        self.inner.registry.get(key).map(|entry| entry.snapshot())
    }

    /// Keys of all currently active channels.
    pub fn active_channels(&self) -> Vec<ChannelKey> {
        self.inner.registry.active_keys()
    }

    /// Number of currently active channels.
    pub fn channel_count(&self) -> usize {
        self.inner.registry.len()
    }

    /// Number of live handles for a channel (0 if inactive).
    pub fn consumer_count(&self, key: &ChannelKey) -> u32 {
        self.inner
            .registry
            .get(key)
            .map(|entry| entry.snapshot().ref_count)
            .unwrap_or(0)
    }

    /// Restart every active channel's backoff sequence from the base delay
    /// with an immediate reopen. Used for manual "retry now" actions.
    pub fn reconnect_all(&self) {
        let entries = self.inner.registry.all_entries();
        tracing::info!(channels = entries.len(), "manual reconnect requested");

        for entry in entries {
            let key = entry.key().clone();
            let generation = entry.generation();

            let taken = self.inner.registry.with_live_entry(&key, generation, |live| {
                let mut state = live.state.lock();
                if !state.channel_state.is_reconnectable() {
                    return None;
                }
                state.reconnect_attempt = 0;
                state.channel_state = ChannelState::Reconnecting;
                state.good_since = None;
                Some((
                    state.connection.take(),
                    state.pump_task.take(),
                    state.timer_task.take(),
                ))
            });

            if let Some(Some((connection, pump_task, timer_task))) = taken {
                if let Some(task) = timer_task {
                    task.abort();
                }
                if let Some(task) = pump_task {
                    task.abort();
                }
                if let Some(connection) = connection {
                    self.inner.registry.close_connection(connection);
                }
                self.inner.metrics.inc_reconnect_attempts();
                ManagerInner::spawn_open(Arc::clone(&self.inner), entry);
            }
        }
    }

    /// Lifetime counters for monitoring.
    pub fn metrics(&self) -> CoordinatorMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl ManagerInner {
    fn spawn_open(inner: Arc<Self>, entry: Arc<ChannelEntry>) {
        tokio::spawn(Self::open_channel(inner, entry));
    }

    /// Open the transport connection for an entry and install it.
    ///
    /// Liveness is re-checked at completion time: if the channel was
    /// released (or replaced) while the open was in flight, the fresh
    /// connection is closed immediately and never surfaced.
    async fn open_channel(inner: Arc<Self>, entry: Arc<ChannelEntry>) {
        let key = entry.key().clone();
        let generation = entry.generation();
        let filter = entry.filter().clone();

        match inner.transport.open(&key, &filter).await {
            Ok(opened) => {
                let pump_task =
                    Self::spawn_pump(Arc::clone(&inner), Arc::clone(&entry), opened.events);
                match inner
                    .registry
                    .install_connection(&key, generation, opened.connection, pump_task)
                {
                    InstallOutcome::Installed => {
                        inner.metrics.inc_channels_opened();
                        tracing::debug!(channel = %key, "channel open");
                    }
                    InstallOutcome::Superseded {
                        connection,
                        pump_task,
                    } => {
                        pump_task.abort();
                        tracing::debug!(
                            channel = %key,
                            "open resolved after release, closing connection"
                        );
                        inner.registry.close_connection(connection);
                    }
                }
            }
            Err(error) => {
                tracing::warn!(channel = %key, %error, "failed to open channel");
                let live = inner
                    .registry
                    .with_live_entry(&key, generation, |live| {
                        let mut state = live.state.lock();
                        state.channel_state = ChannelState::Errored;
                        state.error_count = state.error_count.saturating_add(1);
                        state.last_error = Some(error.to_string());
                        state.good_since = None;
                    })
                    .is_some();
                if live {
                    Self::schedule_retry(inner, entry);
                }
            }
        }
    }

    /// Forward transport events into the channel's consumer fan-out until
    /// the connection dies, then hand off to the reconnect path.
    fn spawn_pump(
        inner: Arc<Self>,
        entry: Arc<ChannelEntry>,
        mut events: mpsc::Receiver<TransportEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Some(TransportEvent::Message(message)) => {
                        entry.record_activity();
                        inner.metrics.inc_messages_forwarded();
                        entry.publish(message);
                    }
                    Some(TransportEvent::Error(reason)) => {
                        tracing::warn!(channel = %entry.key(), %reason, "transport error");
                        Self::begin_reconnect(&inner, &entry, Some(reason));
                        break;
                    }
                    Some(TransportEvent::Closed) | None => {
                        tracing::warn!(channel = %entry.key(), "transport connection dropped");
                        Self::begin_reconnect(&inner, &entry, None);
                        break;
                    }
                }
            }
        })
    }

    /// Tear down the dead connection and schedule a retry.
    ///
    /// A transport error marks the entry `Errored` (reported Disconnected
    /// until a reconnect attempt starts); an orderly remote drop goes
    /// straight to `Reconnecting`.
    fn begin_reconnect(inner: &Arc<Self>, entry: &Arc<ChannelEntry>, failure: Option<String>) {
        let (old_connection, old_timer) = {
            let mut state = entry.state.lock();
            if state.channel_state == ChannelState::Closed {
                return; // released concurrently; teardown already handled it
            }
            match &failure {
                Some(reason) => {
                    state.error_count = state.error_count.saturating_add(1);
                    state.last_error = Some(reason.clone());
                    state.channel_state = ChannelState::Errored;
                }
                None => {
                    state.channel_state = ChannelState::Reconnecting;
                }
            }
            state.good_since = None;
            (state.connection.take(), state.timer_task.take())
        };

        if let Some(timer) = old_timer {
            timer.abort();
        }
        if let Some(connection) = old_connection {
            inner.registry.close_connection(connection);
        }

        Self::schedule_retry(Arc::clone(inner), Arc::clone(entry));
    }

    /// Arm the backoff timer for the next reconnect attempt.
    ///
    /// Arming happens under the registry lock so a concurrent
    /// release-to-zero either sees no timer yet or cancels the one stored
    /// here; released channels never keep a timer running.
    fn schedule_retry(inner: Arc<Self>, entry: Arc<ChannelEntry>) {
        let key = entry.key().clone();
        let generation = entry.generation();

        let armed = inner.registry.with_live_entry(&key, generation, |live| {
            let mut state = live.state.lock();
            let delay = inner.backoff.delay_for(state.reconnect_attempt);
            if let Some(previous) = state.timer_task.take() {
                previous.abort();
            }
            let timer_inner = Arc::clone(&inner);
            let timer_entry = Arc::clone(&entry);
            state.timer_task = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                Self::attempt_reconnect(timer_inner, timer_entry).await;
            }));
            delay
        });

        match armed {
            Some(delay) => {
                tracing::debug!(
                    channel = %key,
                    delay_ms = delay.as_millis() as u64,
                    "reconnect scheduled"
                );
            }
            None => {
                tracing::debug!(channel = %key, "reconnect skipped, channel released");
            }
        }
    }

    async fn attempt_reconnect(inner: Arc<Self>, entry: Arc<ChannelEntry>) {
        let key = entry.key().clone();
        let generation = entry.generation();

        let live = inner
            .registry
            .with_live_entry(&key, generation, |live| {
                let mut state = live.state.lock();
                state.channel_state = ChannelState::Reconnecting;
                state.reconnect_attempt = state.reconnect_attempt.saturating_add(1);
            })
            .is_some();
        if !live {
            return;
        }

        inner.metrics.inc_reconnect_attempts();
        tracing::info!(channel = %key, "attempting reconnect");
        Self::open_channel(inner, entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::transport::InMemoryTransport;
    use crate::domain::foundation::ConnectionQuality;
    use serde_json::json;
    use std::time::Duration;

    fn manager_with_transport() -> (SubscriptionManager, InMemoryTransport) {
        let transport = InMemoryTransport::new();
        let manager = SubscriptionManager::new(
            &RealtimeConfig::default(),
            Arc::new(transport.clone()),
        );
        (manager, transport)
    }

    fn key(name: &str) -> ChannelKey {
        ChannelKey::new(name).unwrap()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_subscribes_share_one_connection() {
        let (manager, transport) = manager_with_transport();
        let k = key("inventory:abc");

        let _h1 = manager.subscribe(k.clone(), json!({})).unwrap();
        let _h2 = manager.subscribe(k.clone(), json!({})).unwrap();
        let _h3 = manager.subscribe(k.clone(), json!({})).unwrap();
        settle().await;

        assert_eq!(transport.open_count(&k), 1);
        assert_eq!(manager.consumer_count(&k), 3);
        assert!(manager.status(&k).state.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn last_unsubscribe_closes_the_connection() {
        let (manager, transport) = manager_with_transport();
        let k = key("inventory:abc");

        let h1 = manager.subscribe(k.clone(), json!({})).unwrap();
        let h2 = manager.subscribe(k.clone(), json!({})).unwrap();
        settle().await;

        manager.unsubscribe(h1);
        settle().await;
        assert_eq!(transport.close_count(&k), 0);

        manager.unsubscribe(h2);
        settle().await;
        assert_eq!(transport.close_count(&k), 1);
        assert!(manager.active_channels().is_empty());
    }

    #[tokio::test]
    async fn non_object_filter_is_rejected_synchronously() {
        let (manager, transport) = manager_with_transport();
        let k = key("inventory:abc");

        let result = manager.subscribe(k.clone(), json!("not-an-object"));
        assert!(matches!(
            result,
            Err(SubscribeError::InvalidFilter { .. })
        ));
        assert_eq!(transport.total_opens(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn open_failure_degrades_status_instead_of_erroring() {
        let (manager, transport) = manager_with_transport();
        transport.fail_next_opens(1, "connection refused");
        let k = key("inventory:abc");

        let _handle = manager.subscribe(k.clone(), json!({})).unwrap();
        settle().await;

        let status = manager.status(&k);
        assert_eq!(
            status.connection_quality,
            ConnectionQuality::Disconnected
        );
        assert_eq!(status.error.as_deref(), Some("Failed to open channel 'inventory:abc': connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn status_for_unknown_channel_is_disconnected() {
        let (manager, _transport) = manager_with_transport();
        let status = manager.status(&key("orders:nope"));
        assert_eq!(status.state, ChannelState::Closed);
        assert_eq!(
            status.connection_quality,
            ConnectionQuality::Disconnected
        );
    }
}
