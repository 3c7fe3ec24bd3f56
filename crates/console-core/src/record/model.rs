//! Record domain model.
//!
//! Records are immutable snapshots of server-owned entities (modules,
//! organizations, templates). The client never derives authoritative state
//! from them; every mutation is round-tripped through a `RecordSource`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A primitive field value as sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for null and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Named field values of a record, ordered by field name.
pub type RecordFields = BTreeMap<String, FieldValue>;

/// The status discriminator used for filtering.
///
/// Modules and organizations expose an `isActive` flag; templates carry a
/// server-named status such as `APPROVED` or `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Active,
    Inactive,
    Named(String),
}

impl RecordStatus {
    /// Returns the filter value this status matches (`active`, `inactive`,
    /// or the lowercased server status).
    pub fn filter_value(&self) -> String {
        match self {
            RecordStatus::Active => "active".to_string(),
            RecordStatus::Inactive => "inactive".to_string(),
            RecordStatus::Named(name) => name.to_lowercase(),
        }
    }
}

impl From<bool> for RecordStatus {
    fn from(is_active: bool) -> Self {
        if is_active {
            RecordStatus::Active
        } else {
            RecordStatus::Inactive
        }
    }
}

/// A single server-owned entity displayed and edited through a list screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque server identifier
    pub id: String,
    /// Entity-specific fields (name, category, country, body, ...)
    pub fields: RecordFields,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a text field, or `None` when absent or not text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }
}
