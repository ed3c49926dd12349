//! Inventory subscription filter.

use serde_json::json;

use crate::domain::foundation::{ChannelSpec, DomainName};

/// Selects which slice of the inventory feed a consumer wants.
///
/// An empty filter subscribes to the whole feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Restrict to one farm stand location.
    pub location_id: Option<String>,

    /// Restrict to specific product categories.
    pub categories: Vec<String>,

    /// Only receive low-stock alerts, not every stock movement.
    pub low_stock_only: bool,
}

impl InventoryFilter {
    /// Filter covering the entire inventory feed.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter scoped to a single location.
    pub fn for_location(location_id: impl Into<String>) -> Self {
        Self {
            location_id: Some(location_id.into()),
            ..Self::default()
        }
    }

    /// Restrict the filter to the given categories.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Only receive low-stock alerts.
    pub fn low_stock_only(mut self) -> Self {
        self.low_stock_only = true;
        self
    }
}

impl ChannelSpec for InventoryFilter {
    fn domain(&self) -> DomainName {
        DomainName::Inventory
    }

    fn filter(&self) -> serde_json::Value {
        // Categories are sorted so logically equal filters derive the
        // same channel key regardless of construction order.
        let mut categories = self.categories.clone();
        categories.sort();

        json!({
            "location_id": self.location_id,
            "categories": categories,
            "low_stock_only": self.low_stock_only,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_filters_share_a_channel() {
        let a = InventoryFilter::for_location("stand-1")
            .with_categories(vec!["produce".to_string(), "dairy".to_string()]);
        let b = InventoryFilter::for_location("stand-1")
            .with_categories(vec!["dairy".to_string(), "produce".to_string()]);

        assert_eq!(a.channel_key(), b.channel_key());
    }

    #[test]
    fn different_locations_use_different_channels() {
        let a = InventoryFilter::for_location("stand-1");
        let b = InventoryFilter::for_location("stand-2");

        assert_ne!(a.channel_key(), b.channel_key());
    }

    #[test]
    fn low_stock_scope_is_part_of_the_key() {
        let full = InventoryFilter::all();
        let alerts = InventoryFilter::all().low_stock_only();

        assert_ne!(full.channel_key(), alerts.channel_key());
    }
}
