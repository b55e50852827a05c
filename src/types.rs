use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Logical start-of-stream position. Both scan cursors are initialized to
/// it and reset to it per the fetch rules.
pub const ORIGIN_ID: &str = "0-0";

/// One stream entry as delivered by the broker
///
/// The id is broker-assigned and totally ordered (`"<ms>-<seq>"`). Entries
/// are immutable once fetched; only their delivery/ack state changes, and
/// that state lives on the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Broker-assigned entry id, e.g. `"1526569495631-0"`
    pub id: String,

    /// Field names and values as stored in the stream
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl Entry {
    /// Create an entry with no fields
    ///
    /// # Example
    ///
    /// ```
    /// use redstream::Entry;
    ///
    /// let entry = Entry::new("1-0").with_field("tx_id", "abc-123");
    /// assert_eq!(entry.field("tx_id"), Some("abc-123"));
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Decode the field map into a caller-supplied type
    ///
    /// Field values are flat strings on the wire; the target type's fields
    /// should deserialize from strings.
    ///
    /// # Example
    ///
    /// ```
    /// use redstream::Entry;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Payment {
    ///     tx_id: String,
    /// }
    ///
    /// let entry = Entry::new("1-0").with_field("tx_id", "abc-123");
    /// let payment: Payment = entry.decode().unwrap();
    /// assert_eq!(payment.tx_id, "abc-123");
    /// ```
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_entry_builder() {
        let entry = Entry::new("1-0")
            .with_field("tx_id", "abc")
            .with_field("amount", "50");

        assert_eq!(entry.id, "1-0");
        assert_eq!(entry.field("tx_id"), Some("abc"));
        assert_eq!(entry.field("amount"), Some("50"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_decode_into_typed_payload() {
        #[derive(Debug, Deserialize)]
        struct Payment {
            tx_id: String,
        }

        let entry = Entry::new("1-0").with_field("tx_id", "abc-123");
        let payment: Payment = entry.decode().unwrap();
        assert_eq!(payment.tx_id, "abc-123");
    }

    #[test]
    fn test_decode_missing_field_is_an_error() {
        #[derive(Debug, Deserialize)]
        struct Payment {
            #[allow(dead_code)]
            tx_id: String,
        }

        let entry = Entry::new("1-0").with_field("other", "x");
        assert!(entry.decode::<Payment>().is_err());
    }
}
