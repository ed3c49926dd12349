//! Order realtime event payloads.

use serde::{Deserialize, Serialize};

/// Events published on order channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order entered the system.
    OrderSubmitted {
        order_id: String,
        kiosk_id: Option<String>,
        total_cents: i64,
    },

    /// An order moved through its lifecycle.
    OrderStatusChanged { order_id: String, status: String },

    /// An order was handed to the customer.
    OrderFulfilled { order_id: String },
}
