//! Message envelope fanned out to channel consumers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ChannelKey, Timestamp};

/// One message received on a logical channel.
///
/// The payload is kept as raw JSON; domain modules provide typed event
/// enums to decode it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// The channel the message arrived on.
    pub channel: ChannelKey,

    /// Raw message payload.
    pub payload: serde_json::Value,

    /// When the transport delivered the message to this client.
    pub received_at: Timestamp,
}

impl ChannelMessage {
    /// Creates a message stamped with the current time.
    pub fn new(channel: ChannelKey, payload: serde_json::Value) -> Self {
        Self {
            channel,
            payload,
            received_at: Timestamp::now(),
        }
    }

    /// Deserializes the payload into a typed event.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainName;
    use serde_json::json;

    #[test]
    fn payload_as_decodes_typed_events() {
        #[derive(Deserialize)]
        struct Ping {
            seq: u64,
        }

        let key = ChannelKey::derive(DomainName::Orders, &json!({}));
        let msg = ChannelMessage::new(key, json!({"seq": 7}));

        let ping: Ping = msg.payload_as().unwrap();
        assert_eq!(ping.seq, 7);
    }

    #[test]
    fn payload_as_reports_shape_mismatches() {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Ping {
            seq: u64,
        }

        let key = ChannelKey::derive(DomainName::Orders, &json!({}));
        let msg = ChannelMessage::new(key, json!({"seq": "not-a-number"}));

        assert!(msg.payload_as::<Ping>().is_err());
    }
}
