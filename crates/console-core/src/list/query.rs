//! Read request built from a list screen's state.

use super::filter::{FilterState, SortDirection, is_reserved};
use super::pagination::PaginationState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full filter + pagination state of a reload, in wire shape.
///
/// `page` is one-based here; the view model keeps a zero-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sort_by: String,
    pub sort_order: SortDirection,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ListQuery {
    pub fn new(filters: &FilterState, pagination: &PaginationState) -> Self {
        Self {
            page: pagination.wire_page(),
            limit: pagination.page_size,
            search: non_empty(&filters.search),
            status: filters
                .has_status()
                .then(|| filters.status.clone()),
            category: non_empty(&filters.category),
            date_from: non_empty(&filters.date_from),
            date_to: non_empty(&filters.date_to),
            sort_by: filters.sort.field.clone(),
            sort_order: filters.sort.direction,
            extra: filters
                .extra
                .iter()
                .filter(|(key, _)| !is_reserved(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Zero-based page index.
    pub fn page_index(&self) -> u64 {
        self.page.saturating_sub(1)
    }

    /// Flattens the query into URL query parameters, omitting unset
    /// filters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        let optional = [
            ("search", &self.search),
            ("status", &self.status),
            ("category", &self.category),
            ("dateFrom", &self.date_from),
            ("dateTo", &self.date_to),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }
        for (key, value) in &self.extra {
            pairs.push((key.clone(), value.clone()));
        }
        pairs.push(("sortBy".to_string(), self.sort_by.clone()));
        pairs.push(("sortOrder".to_string(), self.sort_order.as_str().to_string()));
        pairs
    }
}
