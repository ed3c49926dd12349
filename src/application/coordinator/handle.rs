//! Subscription handle - one consumer's claim on a channel.

use std::fmt;
use std::sync::Weak;

use tokio::sync::broadcast;

use crate::domain::foundation::{ChannelKey, ChannelMessage, ConsumerId, Timestamp};

use super::registry::ChannelRegistry;

/// An opaque claim on a logical channel subscription.
///
/// The handle never exposes the transport connection; consumers read
/// messages through a broadcast receiver and observe connection state via
/// the manager's status API. Releasing the last handle for a channel closes
/// the underlying connection.
///
/// Handles release themselves when dropped, so a consumer that goes away
/// without calling [`release`](Self::release) still cannot leak a
/// subscription.
pub struct SubscriptionHandle {
    key: ChannelKey,
    generation: u64,
    consumer_id: ConsumerId,
    created_at: Timestamp,
    messages: broadcast::Sender<ChannelMessage>,
    registry: Weak<ChannelRegistry>,
    released: bool,
}

impl SubscriptionHandle {
    pub(crate) fn new(
        key: ChannelKey,
        generation: u64,
        consumer_id: ConsumerId,
        messages: broadcast::Sender<ChannelMessage>,
        registry: Weak<ChannelRegistry>,
    ) -> Self {
        Self {
            key,
            generation,
            consumer_id,
            created_at: Timestamp::now(),
            messages,
            registry,
            released: false,
        }
    }

    /// The channel this handle is bound to.
    pub fn channel_key(&self) -> &ChannelKey {
        &self.key
    }

    /// Identifier of the consumer owning this handle.
    pub fn consumer_id(&self) -> ConsumerId {
        self.consumer_id
    }

    /// When the handle was issued.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// A new receiver of this channel's message fan-out.
    ///
    /// Receivers only see messages sent after they are created; slow
    /// receivers that fall behind the broadcast buffer observe a `Lagged`
    /// error and continue from the oldest retained message.
    pub fn messages(&self) -> broadcast::Receiver<ChannelMessage> {
        self.messages.subscribe()
    }

    /// Release this claim on the channel.
    ///
    /// Equivalent to dropping the handle, but reads better at call sites
    /// that release deliberately.
    pub fn release(mut self) {
        self.release_internal();
    }

    fn release_internal(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(registry) = self.registry.upgrade() {
            registry.release(&self.key, self.generation);
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.release_internal();
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("channel", &self.key)
            .field("consumer_id", &self.consumer_id)
            .field("created_at", &self.created_at)
            .field("released", &self.released)
            .finish()
    }
}
