//! In-memory transport implementation for testing.
//!
//! Provides deterministic, scriptable channel connections for unit and
//! integration tests: opens can be delayed or made to fail, events are
//! injected manually, and every open/close call is counted for assertions.
//!
//! This adapter is for **testing only**; production code uses the Redis
//! transport adapter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::foundation::{ChannelKey, ChannelMessage};
use crate::ports::{
    ChannelConnection, ChannelTransport, OpenedChannel, TransportEvent, TransportError,
};

/// In-memory transport for tests.
///
/// Cloning shares the underlying state, so a clone handed to the manager
/// and the original kept by the test observe the same connections.
///
/// # Example
///
/// ```ignore
/// let transport = InMemoryTransport::new();
/// let manager = SubscriptionManager::new(&config, Arc::new(transport.clone()));
///
/// // Drive the channel from the test
/// transport.emit(&key, json!({"type": "order_submitted"})).await;
/// assert_eq!(transport.open_count(&key), 1);
/// ```
#[derive(Clone)]
pub struct InMemoryTransport {
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    event_buffer: usize,
}

struct State {
    open_calls: Vec<(ChannelKey, serde_json::Value)>,
    close_counts: HashMap<ChannelKey, u32>,
    senders: HashMap<u64, (ChannelKey, mpsc::Sender<TransportEvent>)>,
    next_connection_id: u64,
    open_delay: Option<Duration>,
    fail_next_opens: u32,
    fail_reason: String,
}

impl InMemoryTransport {
    /// Creates a transport with the default event buffer.
    pub fn new() -> Self {
        Self::with_event_buffer(32)
    }

    /// Creates a transport with a custom per-connection event buffer.
    pub fn with_event_buffer(event_buffer: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    open_calls: Vec::new(),
                    close_counts: HashMap::new(),
                    senders: HashMap::new(),
                    next_connection_id: 1,
                    open_delay: None,
                    fail_next_opens: 0,
                    fail_reason: String::new(),
                }),
                event_buffer,
            }),
        }
    }

    // === Scripting ===

    /// Delay every subsequent open by the given duration.
    ///
    /// Combined with tokio's paused clock this makes open/release races
    /// reproducible.
    pub fn set_open_delay(&self, delay: Duration) {
        self.shared.state.lock().open_delay = Some(delay);
    }

    /// Make the next `count` opens fail with the given reason.
    pub fn fail_next_opens(&self, count: u32, reason: &str) {
        let mut state = self.shared.state.lock();
        state.fail_next_opens = count;
        state.fail_reason = reason.to_string();
    }

    // === Event injection ===

    /// Deliver a message to every live connection on the channel.
    ///
    /// Returns the number of connections reached.
    pub async fn emit(&self, key: &ChannelKey, payload: serde_json::Value) -> usize {
        let message = ChannelMessage::new(key.clone(), payload);
        self.send_to_channel(key, || TransportEvent::Message(message.clone()))
            .await
    }

    /// Deliver a transport error to every live connection on the channel.
    pub async fn emit_error(&self, key: &ChannelKey, reason: &str) -> usize {
        let reason = reason.to_string();
        self.send_to_channel(key, || TransportEvent::Error(reason.clone()))
            .await
    }

    /// Simulate the remote side closing every live connection on the channel.
    pub async fn emit_closed(&self, key: &ChannelKey) -> usize {
        self.send_to_channel(key, || TransportEvent::Closed).await
    }

    async fn send_to_channel(
        &self,
        key: &ChannelKey,
        mut event: impl FnMut() -> TransportEvent,
    ) -> usize {
        let targets: Vec<mpsc::Sender<TransportEvent>> = {
            let state = self.shared.state.lock();
            state
                .senders
                .values()
                .filter(|(sender_key, _)| sender_key == key)
                .map(|(_, sender)| sender.clone())
                .collect()
        };

        let mut delivered = 0;
        for sender in targets {
            if sender.send(event()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    // === Assertions ===

    /// Number of open calls observed for a channel.
    pub fn open_count(&self, key: &ChannelKey) -> usize {
        self.shared
            .state
            .lock()
            .open_calls
            .iter()
            .filter(|(call_key, _)| call_key == key)
            .count()
    }

    /// Total open calls across all channels.
    pub fn total_opens(&self) -> usize {
        self.shared.state.lock().open_calls.len()
    }

    /// Number of close calls observed for a channel.
    pub fn close_count(&self, key: &ChannelKey) -> u32 {
        self.shared
            .state
            .lock()
            .close_counts
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Number of connections that are open and not yet closed.
    pub fn live_connections(&self) -> usize {
        self.shared.state.lock().senders.len()
    }

    /// The filter value passed with the most recent open for a channel.
    pub fn last_filter(&self, key: &ChannelKey) -> Option<serde_json::Value> {
        self.shared
            .state
            .lock()
            .open_calls
            .iter()
            .rev()
            .find(|(call_key, _)| call_key == key)
            .map(|(_, filter)| filter.clone())
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelTransport for InMemoryTransport {
    async fn open(
        &self,
        key: &ChannelKey,
        filter: &serde_json::Value,
    ) -> Result<OpenedChannel, TransportError> {
        let delay = self.shared.state.lock().open_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.shared.state.lock();
        state.open_calls.push((key.clone(), filter.clone()));

        if state.fail_next_opens > 0 {
            state.fail_next_opens -= 1;
            return Err(TransportError::OpenFailed {
                channel: key.to_string(),
                reason: state.fail_reason.clone(),
            });
        }

        let (sender, events) = mpsc::channel(self.shared.event_buffer);
        let connection_id = state.next_connection_id;
        state.next_connection_id += 1;
        state.senders.insert(connection_id, (key.clone(), sender));

        Ok(OpenedChannel {
            connection: Box::new(InMemoryConnection {
                key: key.clone(),
                connection_id,
                shared: Arc::clone(&self.shared),
            }),
            events,
        })
    }
}

struct InMemoryConnection {
    key: ChannelKey,
    connection_id: u64,
    shared: Arc<Shared>,
}

#[async_trait]
impl ChannelConnection for InMemoryConnection {
    async fn close(&self) {
        let mut state = self.shared.state.lock();
        *state.close_counts.entry(self.key.clone()).or_insert(0) += 1;
        state.senders.remove(&self.connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(name: &str) -> ChannelKey {
        ChannelKey::new(name).unwrap()
    }

    #[tokio::test]
    async fn open_records_the_call_and_filter() {
        let transport = InMemoryTransport::new();
        let k = key("orders:abc");

        let _opened = transport.open(&k, &json!({"scope": "all"})).await.unwrap();

        assert_eq!(transport.open_count(&k), 1);
        assert_eq!(transport.last_filter(&k), Some(json!({"scope": "all"})));
        assert_eq!(transport.live_connections(), 1);
    }

    #[tokio::test]
    async fn emit_reaches_open_connections() {
        let transport = InMemoryTransport::new();
        let k = key("orders:abc");

        let mut opened = transport.open(&k, &json!({})).await.unwrap();
        let delivered = transport.emit(&k, json!({"n": 1})).await;
        assert_eq!(delivered, 1);

        match opened.events.recv().await {
            Some(TransportEvent::Message(message)) => {
                assert_eq!(message.payload, json!({"n": 1}));
                assert_eq!(message.channel, k);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn close_counts_and_removes_the_connection() {
        let transport = InMemoryTransport::new();
        let k = key("orders:abc");

        let opened = transport.open(&k, &json!({})).await.unwrap();
        opened.connection.close().await;

        assert_eq!(transport.close_count(&k), 1);
        assert_eq!(transport.live_connections(), 0);
        assert_eq!(transport.emit(&k, json!({})).await, 0);
    }

    #[tokio::test]
    async fn scripted_failures_consume_themselves() {
        let transport = InMemoryTransport::new();
        let k = key("orders:abc");
        transport.fail_next_opens(1, "boom");

        let first = transport.open(&k, &json!({})).await;
        assert!(matches!(first, Err(TransportError::OpenFailed { .. })));

        let second = transport.open(&k, &json!({})).await;
        assert!(second.is_ok());
        assert_eq!(transport.open_count(&k), 2);
    }
}
