//! Redis pub/sub transport implementation for production deployments.
//!
//! Each logical channel maps to one Redis pub/sub channel named by its key;
//! payloads are JSON documents. Filters are already encoded into the channel
//! key upstream, so the adapter subscribes by name only.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::config::{ChannelConfig, TransportConfig};
use crate::domain::foundation::{ChannelKey, ChannelMessage};
use crate::ports::{
    ChannelConnection, ChannelTransport, OpenedChannel, TransportEvent, TransportError,
};

/// Redis-backed channel transport.
pub struct RedisTransport {
    client: redis::Client,
    connect_timeout: Duration,
    event_buffer: usize,
}

impl RedisTransport {
    /// Create a transport for the given Redis URL.
    pub fn new(url: &str, connect_timeout: Duration, event_buffer: usize) -> Result<Self, TransportError> {
        let client = redis::Client::open(url)
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            connect_timeout,
            event_buffer,
        })
    }

    /// Create a transport from configuration.
    pub fn from_config(
        transport: &TransportConfig,
        channels: &ChannelConfig,
    ) -> Result<Self, TransportError> {
        let url = transport
            .redis_url
            .as_deref()
            .ok_or_else(|| TransportError::Unavailable("no Redis URL configured".to_string()))?;
        Self::new(url, transport.timeout(), channels.event_buffer)
    }
}

#[async_trait]
impl ChannelTransport for RedisTransport {
    async fn open(
        &self,
        key: &ChannelKey,
        _filter: &serde_json::Value,
    ) -> Result<OpenedChannel, TransportError> {
        let connect = self.client.get_async_connection();
        let connection = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| TransportError::OpenFailed {
                channel: key.to_string(),
                reason: format!("connect timeout after {:?}", self.connect_timeout),
            })?
            .map_err(|e| TransportError::OpenFailed {
                channel: key.to_string(),
                reason: e.to_string(),
            })?;

        let mut pubsub = connection.into_pubsub();
        pubsub
            .subscribe(key.as_str())
            .await
            .map_err(|e| TransportError::OpenFailed {
                channel: key.to_string(),
                reason: e.to_string(),
            })?;

        let (sender, events) = mpsc::channel(self.event_buffer);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let channel = key.clone();

        tokio::spawn(async move {
            let mut stream = pubsub.into_on_message();
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    message = stream.next() => match message {
                        Some(message) => {
                            let event = match decode(&channel, &message) {
                                Ok(event) => event,
                                Err(reason) => TransportEvent::Error(reason),
                            };
                            if sender.send(event).await.is_err() {
                                break; // receiver gone, pump aborted
                            }
                        }
                        None => {
                            let _ = sender.send(TransportEvent::Closed).await;
                            break;
                        }
                    }
                }
            }
            // Dropping the stream drops the pub/sub connection, which
            // unsubscribes on the server side.
        });

        Ok(OpenedChannel {
            connection: Box::new(RedisConnection {
                shutdown: Mutex::new(Some(shutdown_tx)),
            }),
            events,
        })
    }
}

fn decode(channel: &ChannelKey, message: &redis::Msg) -> Result<TransportEvent, String> {
    let payload: String = message
        .get_payload()
        .map_err(|e| format!("undecodable payload: {}", e))?;
    let value = serde_json::from_str(&payload)
        .unwrap_or_else(|_| serde_json::Value::String(payload));
    Ok(TransportEvent::Message(ChannelMessage::new(
        channel.clone(),
        value,
    )))
}

struct RedisConnection {
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

#[async_trait]
impl ChannelConnection for RedisConnection {
    async fn close(&self) {
        if let Some(shutdown) = self.shutdown.lock().take() {
            let _ = shutdown.send(());
        }
    }
}
