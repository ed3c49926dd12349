//! Marketing subscription filter.

use serde_json::json;

use crate::domain::foundation::{ChannelSpec, DomainName};

/// Selects which campaigns a consumer follows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketingFilter {
    /// Restrict to specific campaigns; empty means all campaigns.
    pub campaign_ids: Vec<String>,

    /// Include content publication events, not just campaign lifecycle.
    pub include_content: bool,
}

impl MarketingFilter {
    /// Filter covering every campaign, lifecycle events only.
    pub fn all_campaigns() -> Self {
        Self::default()
    }

    /// Filter scoped to the given campaigns.
    pub fn for_campaigns(campaign_ids: Vec<String>) -> Self {
        Self {
            campaign_ids,
            include_content: false,
        }
    }

    /// Also receive content publication events.
    pub fn with_content(mut self) -> Self {
        self.include_content = true;
        self
    }
}

impl ChannelSpec for MarketingFilter {
    fn domain(&self) -> DomainName {
        DomainName::Marketing
    }

    fn filter(&self) -> serde_json::Value {
        let mut campaign_ids = self.campaign_ids.clone();
        campaign_ids.sort();

        json!({
            "campaign_ids": campaign_ids,
            "include_content": self.include_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_order_does_not_change_the_channel() {
        let a = MarketingFilter::for_campaigns(vec!["fall".to_string(), "csa".to_string()]);
        let b = MarketingFilter::for_campaigns(vec!["csa".to_string(), "fall".to_string()]);

        assert_eq!(a.channel_key(), b.channel_key());
    }

    #[test]
    fn content_scope_is_part_of_the_key() {
        let lifecycle = MarketingFilter::all_campaigns();
        let with_content = MarketingFilter::all_campaigns().with_content();

        assert_ne!(lifecycle.channel_key(), with_content.channel_key());
    }
}
