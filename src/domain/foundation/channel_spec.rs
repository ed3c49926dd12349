//! Contract every domain filter satisfies to address a logical channel.

use super::{ChannelKey, DomainName};

/// Maps a domain filter onto its canonical channel.
///
/// Implementations must produce a *deterministic* filter value: two filters
/// describing the same logical data must serialize identically (sort any
/// list fields), so that both consumers land on the same channel and the
/// registry can deduplicate their transport connections.
pub trait ChannelSpec {
    /// The feature area this filter belongs to.
    fn domain(&self) -> DomainName;

    /// Canonical JSON representation of the filter, sent to the transport
    /// when the channel is opened.
    fn filter(&self) -> serde_json::Value;

    /// The canonical channel key for this filter.
    fn channel_key(&self) -> ChannelKey {
        ChannelKey::derive(self.domain(), &self.filter())
    }
}
