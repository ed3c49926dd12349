//! Inventory realtime event payloads.

use serde::{Deserialize, Serialize};

/// Events published on inventory channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    /// A product's stock level changed.
    StockLevelChanged {
        product_id: String,
        location_id: String,
        quantity: i64,
        low_stock: bool,
    },

    /// A product was listed or delisted for sale.
    ProductAvailabilityChanged {
        product_id: String,
        available: bool,
    },
}
