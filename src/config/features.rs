//! Per-domain feature flags

use serde::Deserialize;

use crate::domain::foundation::DomainName;

/// Enables or disables each realtime domain.
///
/// A disabled domain never opens a transport connection; its facade reports
/// `is_enabled = false` and is excluded from aggregate health.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainFlags {
    /// Inventory stock feed
    #[serde(default = "default_true")]
    pub inventory: bool,

    /// Marketing campaign feed
    #[serde(default = "default_true")]
    pub marketing: bool,

    /// Order lifecycle feed
    #[serde(default = "default_true")]
    pub orders: bool,
}

impl DomainFlags {
    /// Check whether a domain's realtime feed is enabled
    pub fn is_enabled(&self, domain: DomainName) -> bool {
        match domain {
            DomainName::Inventory => self.inventory,
            DomainName::Marketing => self.marketing,
            DomainName::Orders => self.orders,
        }
    }

    /// Flags with every domain enabled (test convenience)
    pub fn all_enabled() -> Self {
        Self::default()
    }
}

impl Default for DomainFlags {
    fn default() -> Self {
        Self {
            inventory: true,
            marketing: true,
            orders: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_domains_enabled_by_default() {
        let flags = DomainFlags::default();
        assert!(flags.is_enabled(DomainName::Inventory));
        assert!(flags.is_enabled(DomainName::Marketing));
        assert!(flags.is_enabled(DomainName::Orders));
    }

    #[test]
    fn test_disabling_one_domain_leaves_the_rest() {
        let flags = DomainFlags {
            marketing: false,
            ..Default::default()
        };
        assert!(flags.is_enabled(DomainName::Inventory));
        assert!(!flags.is_enabled(DomainName::Marketing));
        assert!(flags.is_enabled(DomainName::Orders));
    }
}
