//! Inventory realtime facade.

use tokio::sync::broadcast;

use crate::application::coordinator::SubscriptionManager;
use crate::config::DomainFlags;
use crate::domain::foundation::{ChannelMessage, DomainName, DomainStatus, SubscribeError};
use crate::domain::inventory::InventoryFilter;

use super::aggregator::RealtimeFacade;
use super::subscription::DomainSubscription;

/// Live view of the inventory stock feed.
pub struct InventoryRealtime {
    subscription: DomainSubscription,
}

impl InventoryRealtime {
    /// Subscribe to the inventory feed described by the filter.
    pub fn subscribe(
        manager: &SubscriptionManager,
        flags: &DomainFlags,
        filter: InventoryFilter,
    ) -> Result<Self, SubscribeError> {
        Ok(Self {
            subscription: DomainSubscription::attach(manager, flags, &filter)?,
        })
    }

    /// Fresh uniform status snapshot.
    pub fn status(&self) -> DomainStatus {
        self.subscription.status()
    }

    /// A receiver of inventory messages, if the domain is enabled.
    pub fn messages(&self) -> Option<broadcast::Receiver<ChannelMessage>> {
        self.subscription.messages()
    }
}

impl RealtimeFacade for InventoryRealtime {
    fn domain(&self) -> DomainName {
        DomainName::Inventory
    }

    fn status(&self) -> DomainStatus {
        self.subscription.status()
    }
}
