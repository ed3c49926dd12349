//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{DomainName, SubscribeError};

/// Unique identifier for a subscription consumer (one UI surface instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerId(Uuid);

impl ConsumerId {
    /// Creates a new random ConsumerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConsumerId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConsumerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConsumerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Canonical identifier for a logical pub/sub channel.
///
/// Two consumers requesting the same logical data must end up with the same
/// `ChannelKey` so the registry can deduplicate their transport connections.
/// Keys derived via [`ChannelKey::derive`] satisfy this by construction;
/// keys built from raw strings are validated for shape only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelKey(String);

/// Maximum accepted key length. Keys are short domain-prefixed digests;
/// anything longer indicates a caller passing raw filter data as a key.
const MAX_KEY_LEN: usize = 128;

impl ChannelKey {
    /// Creates a channel key from a raw string, validating its shape.
    pub fn new(key: impl Into<String>) -> Result<Self, SubscribeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SubscribeError::EmptyChannelKey);
        }
        if key.len() > MAX_KEY_LEN
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '_' | '-'))
        {
            return Err(SubscribeError::InvalidChannelKey { key });
        }
        Ok(Self(key))
    }

    /// Derives the canonical key for a domain and filter value.
    ///
    /// The derivation is a pure function of its inputs: `serde_json` object
    /// maps are key-sorted, so logically equal filters serialize identically
    /// and always map to the same key.
    pub fn derive(domain: DomainName, filter: &serde_json::Value) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(filter.to_string().as_bytes());
        let digest = hasher.finalize();

        let short: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
        Self(format!("{}:{}", domain.as_str(), short))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn consumer_id_display_is_uuid() {
        let id = ConsumerId::new();
        assert_eq!(format!("{}", id).len(), 36);
    }

    #[test]
    fn channel_key_rejects_empty() {
        assert!(matches!(
            ChannelKey::new(""),
            Err(SubscribeError::EmptyChannelKey)
        ));
    }

    #[test]
    fn channel_key_rejects_whitespace() {
        assert!(matches!(
            ChannelKey::new("orders kiosk"),
            Err(SubscribeError::InvalidChannelKey { .. })
        ));
    }

    #[test]
    fn channel_key_accepts_domain_prefixed_keys() {
        let key = ChannelKey::new("inventory:ab12cd34").unwrap();
        assert_eq!(key.as_str(), "inventory:ab12cd34");
    }

    #[test]
    fn derive_is_deterministic() {
        let a = ChannelKey::derive(DomainName::Inventory, &json!({"location": "stand-1"}));
        let b = ChannelKey::derive(DomainName::Inventory, &json!({"location": "stand-1"}));
        assert_eq!(a, b);
    }

    #[test]
    fn derive_ignores_construction_order_of_object_keys() {
        let mut first = serde_json::Map::new();
        first.insert("a".to_string(), json!(1));
        first.insert("b".to_string(), json!(2));

        let mut second = serde_json::Map::new();
        second.insert("b".to_string(), json!(2));
        second.insert("a".to_string(), json!(1));

        let a = ChannelKey::derive(DomainName::Orders, &serde_json::Value::Object(first));
        let b = ChannelKey::derive(DomainName::Orders, &serde_json::Value::Object(second));
        assert_eq!(a, b);
    }

    #[test]
    fn derive_separates_domains() {
        let filter = json!({"location": "stand-1"});
        let a = ChannelKey::derive(DomainName::Inventory, &filter);
        let b = ChannelKey::derive(DomainName::Marketing, &filter);
        assert_ne!(a, b);
    }

    #[test]
    fn derived_keys_pass_validation() {
        let key = ChannelKey::derive(DomainName::Marketing, &json!({}));
        assert!(ChannelKey::new(key.as_str()).is_ok());
    }
}
