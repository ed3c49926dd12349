//! Feature-area identifiers for realtime domains.

use serde::{Deserialize, Serialize};

/// The platform feature areas served by the realtime layer.
///
/// Each domain owns its own channel namespace; keys derived for different
/// domains never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainName {
    /// Stock levels and product availability.
    Inventory,

    /// Campaigns and promoted content.
    Marketing,

    /// Order lifecycle, including the kiosk POS feed.
    Orders,
}

impl DomainName {
    /// Returns the canonical lowercase name used in channel keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainName::Inventory => "inventory",
            DomainName::Marketing => "marketing",
            DomainName::Orders => "orders",
        }
    }
}

impl std::fmt::Display for DomainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercase_and_stable() {
        assert_eq!(DomainName::Inventory.as_str(), "inventory");
        assert_eq!(DomainName::Marketing.as_str(), "marketing");
        assert_eq!(DomainName::Orders.as_str(), "orders");
    }
}
