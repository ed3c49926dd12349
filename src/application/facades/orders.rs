//! Orders realtime facade (back-office dashboards and the kiosk POS feed).

use tokio::sync::broadcast;

use crate::application::coordinator::SubscriptionManager;
use crate::config::DomainFlags;
use crate::domain::foundation::{ChannelMessage, DomainName, DomainStatus, SubscribeError};
use crate::domain::orders::OrdersFilter;

use super::aggregator::RealtimeFacade;
use super::subscription::DomainSubscription;

/// Live view of the order lifecycle feed.
pub struct OrdersRealtime {
    subscription: DomainSubscription,
}

impl OrdersRealtime {
    /// Subscribe to the order feed described by the filter.
    pub fn subscribe(
        manager: &SubscriptionManager,
        flags: &DomainFlags,
        filter: OrdersFilter,
    ) -> Result<Self, SubscribeError> {
        Ok(Self {
            subscription: DomainSubscription::attach(manager, flags, &filter)?,
        })
    }

    /// Fresh uniform status snapshot.
    pub fn status(&self) -> DomainStatus {
        self.subscription.status()
    }

    /// A receiver of order messages, if the domain is enabled.
    pub fn messages(&self) -> Option<broadcast::Receiver<ChannelMessage>> {
        self.subscription.messages()
    }
}

impl RealtimeFacade for OrdersRealtime {
    fn domain(&self) -> DomainName {
        DomainName::Orders
    }

    fn status(&self) -> DomainStatus {
        self.subscription.status()
    }
}
