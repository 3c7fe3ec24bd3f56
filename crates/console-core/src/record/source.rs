//! Record source traits.
//!
//! Defines the interface the list view models consume. The backend owns
//! filtering, sorting, pagination and persistence; implementations only
//! carry requests to it (or, for tests and offline use, emulate it).

use super::model::{Record, RecordFields};
use super::schema::EntityKind;
use crate::error::{ConsoleError, Result};
use crate::list::{FilterState, ListQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pagination metadata supplied by the server with each page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of records as returned by `RecordSource::list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub records: Vec<Record>,
    pub pagination: PageMeta,
    /// Optional server-defined aggregate (counts per status, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<serde_json::Value>,
}

/// Formats the server can export a filtered list to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            other => Err(ConsoleError::validation(
                "format",
                format!("unsupported export format '{other}'"),
            )),
        }
    }
}

/// Where to fetch a finished export from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHandle {
    pub download_url: String,
}

/// An abstract source of records for one entity type.
///
/// This trait decouples the view models from the transport (REST API,
/// in-memory fixture, ...). Every method is one request; implementations
/// must not retry on their own.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetches one page of records matching the query.
    async fn list(&self, query: &ListQuery) -> Result<ListPage>;

    /// Creates a record and returns the server's snapshot of it.
    async fn create(&self, fields: &RecordFields) -> Result<Record>;

    /// Updates a record and returns the server's snapshot of it.
    ///
    /// Returns `ConsoleError::NotFound` when the record no longer exists.
    async fn update(&self, id: &str, fields: &RecordFields) -> Result<Record>;

    /// Deletes a single record.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Deletes a batch of records in one request.
    ///
    /// The batch is atomic from the caller's point of view: the server does
    /// not report per-id results.
    async fn bulk_delete(&self, ids: &[String]) -> Result<()>;

    /// Sets the active flag of a record (modules only).
    async fn toggle_active(&self, id: &str, value: bool) -> Result<Record>;

    /// Requests an export of every record matching `filters`.
    async fn export(&self, format: ExportFormat, filters: &FilterState) -> Result<ExportHandle>;
}

/// Auxiliary lookups used to populate filter dropdowns.
#[async_trait]
pub trait LookupSource: Send + Sync {
    async fn categories(&self, kind: EntityKind) -> Result<Vec<String>>;

    async fn countries(&self) -> Result<Vec<String>>;

    async fn states(&self, country: &str) -> Result<Vec<String>>;

    async fn cities(&self, state: &str) -> Result<Vec<String>>;

    async fn languages(&self) -> Result<Vec<String>>;
}
