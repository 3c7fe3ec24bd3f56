//! Filter and sort state of a list screen.

use crate::error::{ConsoleError, Result};
use crate::record::EntitySchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Status filter value meaning "no status restriction".
pub const STATUS_ALL: &str = "all";

/// Query parameters the list request sets itself. None of them can be used
/// as an extra filter.
pub const RESERVED_QUERY_KEYS: [&str; 9] = [
    "page",
    "limit",
    "sortBy",
    "sortOrder",
    "search",
    "status",
    "category",
    "dateFrom",
    "dateTo",
];

pub(crate) fn is_reserved(key: &str) -> bool {
    RESERVED_QUERY_KEYS.contains(&key)
}

/// Sort direction accepted by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Wire value (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

/// Keys accepted by `ListViewModel::set_filter`.
///
/// `Extra` covers entity-specific dropdowns (country, state, city,
/// language, ...) whose validity the server decides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Search,
    Status,
    Category,
    DateFrom,
    DateTo,
    Extra(String),
}

impl From<&str> for FilterKey {
    fn from(key: &str) -> Self {
        match key {
            "search" => FilterKey::Search,
            "status" => FilterKey::Status,
            "category" => FilterKey::Category,
            "dateFrom" | "date_from" => FilterKey::DateFrom,
            "dateTo" | "date_to" => FilterKey::DateTo,
            other => FilterKey::Extra(other.to_string()),
        }
    }
}

impl FilterKey {
    /// Rejects extra keys that are blank or would shadow a query parameter
    /// (`page`, `sortBy`, ...).
    pub fn check(&self) -> Result<()> {
        match self {
            FilterKey::Extra(name) if name.trim().is_empty() => {
                Err(ConsoleError::validation("filter", "key must not be empty"))
            }
            FilterKey::Extra(name) if is_reserved(name) => Err(ConsoleError::validation(
                name.clone(),
                "is a reserved query parameter, not a filter",
            )),
            _ => Ok(()),
        }
    }
}

/// Filter state of one list screen.
///
/// Empty strings mean "unset"; status `"all"` means no status restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub status: String,
    pub category: String,
    pub date_from: String,
    pub date_to: String,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
    pub sort: SortState,
}

impl FilterState {
    /// Default filters for a schema: empty search, all statuses, the
    /// schema's default sort column ascending.
    pub fn defaults_for(schema: &EntitySchema) -> Self {
        Self {
            search: String::new(),
            status: STATUS_ALL.to_string(),
            category: String::new(),
            date_from: String::new(),
            date_to: String::new(),
            extra: BTreeMap::new(),
            sort: SortState {
                field: schema.default_sort.clone(),
                direction: SortDirection::Ascending,
            },
        }
    }

    /// Merges one filter value into the state.
    ///
    /// An empty value removes an extra filter; for the fixed keys it resets
    /// them to their unset value.
    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FilterKey::Search => self.search = value,
            FilterKey::Status => {
                self.status = if value.is_empty() {
                    STATUS_ALL.to_string()
                } else {
                    value
                }
            }
            FilterKey::Category => self.category = value,
            FilterKey::DateFrom => self.date_from = value,
            FilterKey::DateTo => self.date_to = value,
            FilterKey::Extra(name) => {
                if value.is_empty() {
                    self.extra.remove(&name);
                } else {
                    self.extra.insert(name, value);
                }
            }
        }
    }

    /// Applies a sort header click: same field toggles, new field starts
    /// ascending.
    pub fn apply_sort(&mut self, field: &str) {
        if self.sort.field == field {
            self.sort.direction = self.sort.direction.toggled();
        } else {
            self.sort = SortState {
                field: field.to_string(),
                direction: SortDirection::Ascending,
            };
        }
    }

    /// Checks every extra filter key, see `FilterKey::check`.
    pub fn check_extras(&self) -> Result<()> {
        for name in self.extra.keys() {
            FilterKey::Extra(name.clone()).check()?;
        }
        Ok(())
    }

    /// True when a status restriction is active.
    pub fn has_status(&self) -> bool {
        !self.status.is_empty() && self.status != STATUS_ALL
    }
}
