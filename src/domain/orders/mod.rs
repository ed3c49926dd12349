//! Orders domain - order lifecycle and the kiosk POS feed.

mod events;
mod filter;

pub use events::OrderEvent;
pub use filter::{OrderScope, OrdersFilter};
