//! # Record Schema
//!
//! The shape of one item in a remote collection.
//!
//! A `Record` is pure data. Its fields are typed and validated once, when a
//! page is decoded; nothing re-validates them on read. A payload that is
//! missing a required field never produces a partially populated record:
//! the whole page is rejected instead (see `envelope::decode_page`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// RECORD IDENTIFIER
// =============================================================================

/// Identifier of a record.
///
/// Unique within a page and stable across pages, so it is safe to use as a
/// render key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Get the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// One entity of the collection.
///
/// `username` is the unique handle and `email` the contact field. Any other
/// JSON members of the wire object land in `attributes`; the `BTreeMap`
/// keeps their serialized order deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Record {
    /// Create a record with no additional attributes.
    #[must_use]
    pub fn new(id: u64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: RecordId(id),
            username: username.into(),
            email: email.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style helper that adds one extra attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Render an attribute as display text.
    ///
    /// Strings are shown bare; every other JSON value uses its compact form.
    #[must_use]
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_members_are_flattened_into_attributes() {
        let json = r#"{"id":7,"username":"ada","email":"ada@example.com","role":"admin"}"#;
        let record: Record = serde_json::from_str(json).expect("decode");

        assert_eq!(record.id, RecordId(7));
        assert_eq!(record.attribute_text("role").as_deref(), Some("admin"));
    }

    #[test]
    fn missing_handle_is_rejected() {
        let json = r#"{"id":7,"email":"ada@example.com"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn attributes_serialize_inline() {
        let record = Record::new(1, "bob", "bob@example.com")
            .with_attribute("active", serde_json::Value::Bool(true));
        let json = serde_json::to_string(&record).expect("encode");

        assert!(json.contains("\"active\":true"));
        assert!(!json.contains("attributes"));
    }

    #[test]
    fn non_string_attribute_text_is_compact_json() {
        let record =
            Record::new(1, "bob", "bob@example.com").with_attribute("logins", serde_json::json!(3));
        assert_eq!(record.attribute_text("logins").as_deref(), Some("3"));
        assert_eq!(record.attribute_text("missing"), None);
    }
}
