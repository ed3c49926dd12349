//! Orders subscription filter.

use serde::Serialize;
use serde_json::json;

use crate::domain::foundation::{ChannelSpec, DomainName};

/// Which orders a consumer wants to follow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum OrderScope {
    /// Every order on the platform (back-office dashboards).
    #[default]
    All,

    /// Orders placed at one kiosk terminal (the POS feed).
    Kiosk { kiosk_id: String },

    /// Orders belonging to one customer.
    Customer { customer_id: String },
}

/// Selects which slice of the order feed a consumer wants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersFilter {
    /// Scope of orders to follow.
    pub scope: OrderScope,

    /// Exclude fulfilled and cancelled orders.
    pub active_only: bool,
}

impl OrdersFilter {
    /// Filter covering every order.
    pub fn all() -> Self {
        Self::default()
    }

    /// The POS feed for one kiosk terminal.
    pub fn for_kiosk(kiosk_id: impl Into<String>) -> Self {
        Self {
            scope: OrderScope::Kiosk {
                kiosk_id: kiosk_id.into(),
            },
            active_only: true,
        }
    }

    /// Orders belonging to one customer.
    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        Self {
            scope: OrderScope::Customer {
                customer_id: customer_id.into(),
            },
            active_only: false,
        }
    }

    /// Exclude fulfilled and cancelled orders.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
}

impl ChannelSpec for OrdersFilter {
    fn domain(&self) -> DomainName {
        DomainName::Orders
    }

    fn filter(&self) -> serde_json::Value {
        json!({
            "scope": self.scope,
            "active_only": self.active_only,
        })
    }
}
