//! Marketing realtime facade.

use tokio::sync::broadcast;

use crate::application::coordinator::SubscriptionManager;
use crate::config::DomainFlags;
use crate::domain::foundation::{ChannelMessage, DomainName, DomainStatus, SubscribeError};
use crate::domain::marketing::MarketingFilter;

use super::aggregator::RealtimeFacade;
use super::subscription::DomainSubscription;

/// Live view of the marketing campaign feed.
pub struct MarketingRealtime {
    subscription: DomainSubscription,
}

impl MarketingRealtime {
    /// Subscribe to the campaign feed described by the filter.
    pub fn subscribe(
        manager: &SubscriptionManager,
        flags: &DomainFlags,
        filter: MarketingFilter,
    ) -> Result<Self, SubscribeError> {
        Ok(Self {
            subscription: DomainSubscription::attach(manager, flags, &filter)?,
        })
    }

    /// Fresh uniform status snapshot.
    pub fn status(&self) -> DomainStatus {
        self.subscription.status()
    }

    /// A receiver of marketing messages, if the domain is enabled.
    pub fn messages(&self) -> Option<broadcast::Receiver<ChannelMessage>> {
        self.subscription.messages()
    }
}

impl RealtimeFacade for MarketingRealtime {
    fn domain(&self) -> DomainName {
        DomainName::Marketing
    }

    fn status(&self) -> DomainStatus {
        self.subscription.status()
    }
}
