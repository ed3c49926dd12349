//! Marketing realtime event payloads.

use serde::{Deserialize, Serialize};

/// Events published on marketing channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketingEvent {
    /// A campaign went live.
    CampaignLaunched { campaign_id: String, name: String },

    /// A campaign finished or was cancelled.
    CampaignEnded { campaign_id: String },

    /// Promotional content was published.
    ContentPublished {
        content_id: String,
        campaign_id: Option<String>,
    },
}
