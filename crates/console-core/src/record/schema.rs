//! Entity schemas for the management screens.
//!
//! Every management screen runs the same `ListViewModel`; the schema is what
//! differs between them: which REST resource it talks to, which columns the
//! server accepts for sorting, and which fields a create/update must carry.

use super::model::RecordFields;
use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of records the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Module,
    Organization,
    Template,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Module,
        EntityKind::Organization,
        EntityKind::Template,
    ];

    /// Singular name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Organization => "organization",
            EntityKind::Template => "template",
        }
    }

    /// Returns the built-in schema for this kind.
    pub fn schema(&self) -> EntitySchema {
        match self {
            EntityKind::Module => EntitySchema {
                kind: *self,
                resource: "modules".to_string(),
                sort_columns: columns(&["name", "category", "isActive", "createdAt", "updatedAt"]),
                default_sort: "createdAt".to_string(),
                required_fields: columns(&["name", "category"]),
                supports_toggle: true,
            },
            EntityKind::Organization => EntitySchema {
                kind: *self,
                resource: "organizations".to_string(),
                sort_columns: columns(&["name", "email", "country", "city", "createdAt", "updatedAt"]),
                default_sort: "createdAt".to_string(),
                required_fields: columns(&["name", "email", "country"]),
                supports_toggle: false,
            },
            EntityKind::Template => EntitySchema {
                kind: *self,
                resource: "templates".to_string(),
                sort_columns: columns(&["name", "category", "language", "status", "createdAt", "updatedAt"]),
                default_sort: "createdAt".to_string(),
                required_fields: columns(&["name", "category", "language", "body"]),
                supports_toggle: false,
            },
        }
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "module" | "modules" => Ok(EntityKind::Module),
            "organization" | "organizations" | "org" | "orgs" => Ok(EntityKind::Organization),
            "template" | "templates" => Ok(EntityKind::Template),
            other => Err(ConsoleError::invalid(format!("Unknown entity type: {other}"))),
        }
    }
}

/// Describes one management screen's contract with the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub kind: EntityKind,
    /// REST resource path segment (e.g. `modules`)
    pub resource: String,
    /// Columns the server accepts as `sortBy`
    pub sort_columns: Vec<String>,
    /// Sort column used when filters are cleared
    pub default_sort: String,
    /// Fields that must be present and non-blank on create/update
    pub required_fields: Vec<String>,
    /// Whether the server exposes the toggle-active endpoint
    pub supports_toggle: bool,
}

impl EntitySchema {
    /// Checks that `field` is an accepted sort column.
    pub fn check_sort_column(&self, field: &str) -> Result<()> {
        if self.sort_columns.iter().any(|c| c == field) {
            Ok(())
        } else {
            Err(ConsoleError::validation(
                "sortBy",
                format!("'{}' is not a sortable {} column", field, self.kind),
            ))
        }
    }

    /// Validates fields for a create request: every required field must be
    /// present and non-blank.
    pub fn validate_create(&self, fields: &RecordFields) -> Result<()> {
        for name in &self.required_fields {
            match fields.get(name) {
                Some(value) if !value.is_blank() => {}
                _ => return Err(ConsoleError::validation(name, "is required")),
            }
        }
        Ok(())
    }

    /// Validates fields for an update request.
    ///
    /// Updates may be partial, so only required fields that are present are
    /// checked, and they must not be blanked out.
    pub fn validate_update(&self, fields: &RecordFields) -> Result<()> {
        if fields.is_empty() {
            return Err(ConsoleError::invalid("No fields to update"));
        }
        for name in &self.required_fields {
            if let Some(value) = fields.get(name)
                && value.is_blank()
            {
                return Err(ConsoleError::validation(name, "must not be empty"));
            }
        }
        Ok(())
    }
}
