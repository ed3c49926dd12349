//! Shared facade template - one domain consumer's live attachment.

use tokio::sync::broadcast;

use crate::application::coordinator::{SubscriptionHandle, SubscriptionManager};
use crate::config::DomainFlags;
use crate::domain::foundation::{
    ChannelKey, ChannelMessage, ChannelSpec, DomainName, DomainStatus, SubscribeError,
};

/// A domain consumer's attachment to the shared subscription manager.
///
/// Per-domain facades wrap this template; it owns the handle (released on
/// drop), derives the channel key from the domain filter, and produces the
/// uniform [`DomainStatus`] snapshot. A domain disabled by feature flag
/// never subscribes and reports `is_enabled = false`.
pub struct DomainSubscription {
    domain: DomainName,
    channel_key: Option<ChannelKey>,
    handle: Option<SubscriptionHandle>,
    manager: SubscriptionManager,
}

impl DomainSubscription {
    /// Attach to the channel described by the filter.
    pub fn attach(
        manager: &SubscriptionManager,
        flags: &DomainFlags,
        spec: &impl ChannelSpec,
    ) -> Result<Self, SubscribeError> {
        let domain = spec.domain();

        if !flags.is_enabled(domain) {
            tracing::debug!(%domain, "realtime disabled by feature flag");
            return Ok(Self {
                domain,
                channel_key: None,
                handle: None,
                manager: manager.clone(),
            });
        }

        let channel_key = spec.channel_key();
        let handle = manager.subscribe(channel_key.clone(), spec.filter())?;
        Ok(Self {
            domain,
            channel_key: Some(channel_key),
            handle: Some(handle),
            manager: manager.clone(),
        })
    }

    /// The feature area this subscription belongs to.
    pub fn domain(&self) -> DomainName {
        self.domain
    }

    /// Whether the domain's realtime feed is enabled.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    /// The channel this subscription is attached to, if enabled.
    pub fn channel_key(&self) -> Option<&ChannelKey> {
        self.channel_key.as_ref()
    }

    /// Fresh uniform status snapshot.
    pub fn status(&self) -> DomainStatus {
        match &self.channel_key {
            Some(key) => DomainStatus::from_health(self.domain, &self.manager.status(key)),
            None => DomainStatus::disabled(self.domain),
        }
    }

    /// A receiver of the channel's message fan-out, if enabled.
    pub fn messages(&self) -> Option<broadcast::Receiver<ChannelMessage>> {
        self.handle.as_ref().map(|handle| handle.messages())
    }

    /// Release the subscription explicitly.
    ///
    /// Dropping the facade has the same effect.
    pub fn detach(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }
}
