//! Record wire DTOs.
//!
//! The admin API sends records as flat JSON objects: an id (`id` or
//! Mongo-style `_id`), timestamps, an `isActive` flag or a `status` string,
//! and any number of entity-specific fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use console_core::record::{FieldValue, Record, RecordFields, RecordStatus};

/// Record ids arrive as strings or numbers depending on the backend table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdDto {
    Text(String),
    Number(i64),
}

impl From<IdDto> for String {
    fn from(id: IdDto) -> Self {
        match id {
            IdDto::Text(s) => s,
            IdDto::Number(n) => n.to_string(),
        }
    }
}

/// Record DTO as sent by the admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    #[serde(alias = "_id")]
    pub id: IdDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Everything else
    #[serde(flatten)]
    pub fields: BTreeMap<String, JsonValue>,
}

fn field_from_json(value: JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(n.as_f64().unwrap_or_default()),
        },
        JsonValue::String(s) => FieldValue::Text(s),
        // Nested objects/arrays are shown as their JSON text
        other => FieldValue::Text(other.to_string()),
    }
}

fn status_from_wire(is_active: Option<bool>, status: Option<String>) -> RecordStatus {
    if let Some(active) = is_active {
        return RecordStatus::from(active);
    }
    match status {
        Some(s) if s.eq_ignore_ascii_case("active") => RecordStatus::Active,
        Some(s) if s.eq_ignore_ascii_case("inactive") => RecordStatus::Inactive,
        Some(s) => RecordStatus::Named(s),
        None => RecordStatus::Active,
    }
}

impl From<RecordDto> for Record {
    fn from(dto: RecordDto) -> Self {
        let fields: RecordFields = dto
            .fields
            .into_iter()
            .filter(|(key, _)| key != "__v")
            .map(|(key, value)| (key, field_from_json(value)))
            .collect();
        let created_at = dto.created_at.unwrap_or_default();
        Record {
            id: dto.id.into(),
            fields,
            status: status_from_wire(dto.is_active, dto.status),
            created_at,
            updated_at: dto.updated_at.unwrap_or(created_at),
        }
    }
}

impl From<&Record> for RecordDto {
    fn from(record: &Record) -> Self {
        let (is_active, status) = match &record.status {
            RecordStatus::Active => (Some(true), None),
            RecordStatus::Inactive => (Some(false), None),
            RecordStatus::Named(name) => (None, Some(name.clone())),
        };
        RecordDto {
            id: IdDto::Text(record.id.clone()),
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
            is_active,
            status,
            fields: record
                .fields
                .iter()
                .map(|(key, value)| {
                    (key.clone(), serde_json::to_value(value).unwrap_or(JsonValue::Null))
                })
                .collect(),
        }
    }
}
