//! Channel registry - single source of truth for active channels.
//!
//! Maps each `ChannelKey` to one refcounted entry owning the transport
//! connection for that channel. The registry does synchronous bookkeeping
//! only; the subscription manager owns the transport and the async tasks.
//!
//! # Thread safety
//!
//! Two lock levels: the registry map, then a per-entry state lock. Code
//! that holds an entry's state lock never takes the map lock, so the
//! ordering `map → state` is acyclic. Critical sections contain no awaits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::domain::foundation::{ChannelKey, ChannelMessage, ChannelState, ConsumerId};
use crate::ports::ChannelConnection;

use super::handle::SubscriptionHandle;
use super::metrics::CoordinatorMetrics;

/// Whether an acquire attached to an existing channel or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AcquireOutcome {
    /// An entry for the key already existed; its refcount was incremented.
    Attached,

    /// A new entry was created; the caller must start the transport open.
    Created,
}

/// Result of installing a freshly opened connection.
pub(crate) enum InstallOutcome {
    /// The connection now backs the entry.
    Installed,

    /// The channel was released or replaced while the open was in flight.
    /// The caller must close the returned connection and abort the pump;
    /// the late connection is never surfaced.
    Superseded {
        connection: Box<dyn ChannelConnection>,
        pump_task: JoinHandle<()>,
    },
}

/// Mutable bookkeeping for one channel.
pub(crate) struct EntryState {
    pub ref_count: u32,
    pub channel_state: ChannelState,
    pub connection: Option<Box<dyn ChannelConnection>>,
    pub last_activity: Instant,
    pub good_since: Option<Instant>,
    pub error_count: u32,
    pub last_error: Option<String>,
    pub reconnect_attempt: u32,
    pub pump_task: Option<JoinHandle<()>>,
    pub timer_task: Option<JoinHandle<()>>,
}

impl EntryState {
    fn new() -> Self {
        Self {
            ref_count: 1,
            channel_state: ChannelState::Connecting,
            connection: None,
            last_activity: Instant::now(),
            good_since: None,
            error_count: 0,
            last_error: None,
            reconnect_attempt: 0,
            pump_task: None,
            timer_task: None,
        }
    }
}

/// Read-only copy of a channel entry's state, taken under its lock.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    /// The channel this snapshot describes.
    pub key: ChannelKey,

    /// Number of live handles referencing the channel.
    pub ref_count: u32,

    /// Current lifecycle state.
    pub state: ChannelState,

    /// Transport errors since the last successful (re)connect.
    pub error_count: u32,

    /// Most recent transport error, if any.
    pub last_error: Option<String>,

    /// Instant of the last received message or successful open.
    pub last_activity: Instant,

    /// When the entry last became open and error-free, if it still is.
    pub good_since: Option<Instant>,
}

/// One active logical channel.
pub(crate) struct ChannelEntry {
    key: ChannelKey,
    generation: u64,
    filter: serde_json::Value,
    messages: broadcast::Sender<ChannelMessage>,
    pub(crate) state: Mutex<EntryState>,
}

impl ChannelEntry {
    pub(crate) fn key(&self) -> &ChannelKey {
        &self.key
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn filter(&self) -> &serde_json::Value {
        &self.filter
    }

    /// Fan a message out to every consumer of this channel.
    ///
    /// Send errors (no receivers) are ignored; a channel with refcount > 0
    /// but no active message listeners is legitimate.
    pub(crate) fn publish(&self, message: ChannelMessage) -> usize {
        self.messages.send(message).unwrap_or(0)
    }

    /// Record a received message or heartbeat.
    pub(crate) fn record_activity(&self) {
        self.state.lock().last_activity = Instant::now();
    }

    /// Copy the current state for health classification.
    pub(crate) fn snapshot(&self) -> ChannelSnapshot {
        let state = self.state.lock();
        ChannelSnapshot {
            key: self.key.clone(),
            ref_count: state.ref_count,
            state: state.channel_state,
            error_count: state.error_count,
            last_error: state.last_error.clone(),
            last_activity: state.last_activity,
            good_since: state.good_since,
        }
    }
}

/// Refcounted map of active channels.
pub(crate) struct ChannelRegistry {
    entries: Mutex<HashMap<ChannelKey, Arc<ChannelEntry>>>,
    next_generation: AtomicU64,
    message_buffer: usize,
    metrics: Arc<CoordinatorMetrics>,
}

impl ChannelRegistry {
    pub(crate) fn new(message_buffer: usize, metrics: Arc<CoordinatorMetrics>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            message_buffer,
            metrics,
        }
    }

    /// Bind a new handle to the channel, creating the entry if needed.
    ///
    /// Returns immediately; a `Created` outcome means the caller must start
    /// the transport open, whose completion is observed via status.
    pub(crate) fn acquire(
        self: &Arc<Self>,
        key: ChannelKey,
        filter: serde_json::Value,
    ) -> (SubscriptionHandle, AcquireOutcome, Arc<ChannelEntry>) {
        let (entry, outcome) = {
            let mut entries = self.entries.lock();
            match entries.get(&key).cloned() {
                Some(entry) => {
                    entry.state.lock().ref_count += 1;
                    (entry, AcquireOutcome::Attached)
                }
                None => {
                    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                    let (messages, _) = broadcast::channel(self.message_buffer);
                    let entry = Arc::new(ChannelEntry {
                        key: key.clone(),
                        generation,
                        filter,
                        messages,
                        state: Mutex::new(EntryState::new()),
                    });
                    entries.insert(key.clone(), Arc::clone(&entry));
                    (entry, AcquireOutcome::Created)
                }
            }
        };

        self.metrics.inc_handles_issued();
        tracing::debug!(
            channel = %key,
            outcome = ?outcome,
            "handle acquired"
        );

        let handle = SubscriptionHandle::new(
            key,
            entry.generation,
            ConsumerId::new(),
            entry.messages.clone(),
            Arc::downgrade(self),
        );
        (handle, outcome, entry)
    }

    /// Release one handle's claim on the channel.
    ///
    /// At refcount zero the entry is removed, its backoff timer and pump are
    /// aborted, and the connection close is dispatched - all within this
    /// call. Releases referencing an unknown or superseded channel are
    /// recorded as warnings, never errors.
    pub(crate) fn release(&self, key: &ChannelKey, generation: u64) {
        let teardown = {
            let mut entries = self.entries.lock();
            let Some(entry) = entries.get(key).cloned() else {
                drop(entries);
                self.warn_stale_release(key);
                return;
            };
            if entry.generation != generation {
                drop(entries);
                self.warn_stale_release(key);
                return;
            }

            let mut state = entry.state.lock();
            if state.ref_count == 0 {
                // Entries are removed when they hit zero, so this indicates
                // registry corruption rather than caller misuse.
                drop(state);
                drop(entries);
                self.warn_stale_release(key);
                return;
            }

            state.ref_count -= 1;
            if state.ref_count > 0 {
                let remaining = state.ref_count;
                drop(state);
                drop(entries);
                self.metrics.inc_handles_released();
                tracing::debug!(channel = %key, remaining, "handle released");
                return;
            }

            state.channel_state = ChannelState::Closed;
            let teardown = (
                state.connection.take(),
                state.pump_task.take(),
                state.timer_task.take(),
            );
            drop(state);
            entries.remove(key);
            teardown
        };

        let (connection, pump_task, timer_task) = teardown;
        if let Some(task) = timer_task {
            task.abort();
        }
        if let Some(task) = pump_task {
            task.abort();
        }
        if let Some(connection) = connection {
            self.close_connection(connection);
        }

        self.metrics.inc_handles_released();
        tracing::debug!(channel = %key, "last handle released, channel closed");
    }

    /// Install a freshly opened connection, unless the entry was released
    /// or replaced while the open was in flight.
    pub(crate) fn install_connection(
        &self,
        key: &ChannelKey,
        generation: u64,
        connection: Box<dyn ChannelConnection>,
        pump_task: JoinHandle<()>,
    ) -> InstallOutcome {
        let entries = self.entries.lock();
        let Some(entry) = entries.get(key) else {
            return InstallOutcome::Superseded {
                connection,
                pump_task,
            };
        };
        if entry.generation != generation {
            return InstallOutcome::Superseded {
                connection,
                pump_task,
            };
        }

        let mut state = entry.state.lock();
        if state.channel_state == ChannelState::Closed || state.connection.is_some() {
            return InstallOutcome::Superseded {
                connection,
                pump_task,
            };
        }

        let now = Instant::now();
        state.connection = Some(connection);
        state.pump_task = Some(pump_task);
        state.channel_state = ChannelState::Open;
        state.error_count = 0;
        state.last_error = None;
        state.reconnect_attempt = 0;
        state.last_activity = now;
        state.good_since = Some(now);
        InstallOutcome::Installed
    }

    /// Run a closure against the entry while it is still the live
    /// incarnation for its key. Returns `None` if the channel was released
    /// or replaced.
    pub(crate) fn with_live_entry<T>(
        &self,
        key: &ChannelKey,
        generation: u64,
        f: impl FnOnce(&Arc<ChannelEntry>) -> T,
    ) -> Option<T> {
        let entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.generation == generation => Some(f(entry)),
            _ => None,
        }
    }

    /// Read-only lookup for status reporting.
    pub(crate) fn get(&self, key: &ChannelKey) -> Option<Arc<ChannelEntry>> {
        self.entries.lock().get(key).cloned()
    }

    /// All currently active entries.
    pub(crate) fn all_entries(&self) -> Vec<Arc<ChannelEntry>> {
        self.entries.lock().values().cloned().collect()
    }

    /// All currently active channel keys.
    pub(crate) fn active_keys(&self) -> Vec<ChannelKey> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Number of active channels.
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Dispatch an async connection close. Outside a runtime (pure
    /// bookkeeping tests) the connection is simply dropped.
    pub(crate) fn close_connection(&self, connection: Box<dyn ChannelConnection>) {
        self.metrics.inc_channels_closed();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                connection.close().await;
            });
        }
    }

    fn warn_stale_release(&self, key: &ChannelKey) {
        self.metrics.inc_stale_releases();
        tracing::warn!(
            channel = %key,
            "release for unknown or already-closed channel (caller bug)"
        );
    }
}
