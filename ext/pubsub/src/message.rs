//! `Message` — One captured pub/sub message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A message captured on a topic: a dynamically shaped body plus
/// string-to-string attributes. Immutable once appended to a topic.
///
/// The body serializes under the `msg` key, matching the wire shape
/// produced by the delivery simulator.
///
/// # Example
///
/// ```
/// use attest_pubsub::Message;
/// use serde_json::json;
///
/// let msg = Message::new(json!({"id": 7})).with_attribute("source", "orders");
/// assert_eq!(msg.attributes().get("source").map(String::as_str), Some("orders"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// The decoded message body.
    #[serde(rename = "msg")]
    data: Value,
    /// String-to-string attribute mapping.
    attributes: BTreeMap<String, String>,
}

impl Message {
    /// Create a message with the given body and no attributes.
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self {
            data,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The message body.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// The attribute mapping.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// The comparison value a check matches patterns against:
    /// `{"data": body, "attributes": attributes}`.
    #[must_use]
    pub fn candidate_value(&self) -> Value {
        serde_json::json!({
            "data": self.data,
            "attributes": self.attributes,
        })
    }
}
