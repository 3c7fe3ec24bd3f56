//! In-memory `RecordSource`.
//!
//! Emulates the admin API over a `Vec<Record>`: filtering, sorting and
//! pagination happen here the way the server would do them. Used by the
//! offline CLI mode and by integration tests, which can also make it fail
//! on demand.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use console_core::list::{FilterState, ListQuery, SortDirection};
use console_core::record::{
    EntitySchema, ExportFormat, ExportHandle, FieldValue, ListPage, PageMeta, Record,
    RecordFields, RecordSource, RecordStatus,
};
use console_core::{ConsoleError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<Record>,
    fail_next: usize,
    calls: usize,
}

/// Record source backed by a vector.
#[derive(Debug)]
pub struct InMemoryRecordSource {
    schema: EntitySchema,
    state: RwLock<MemoryState>,
}

impl InMemoryRecordSource {
    pub fn new(schema: EntitySchema) -> Self {
        Self::with_records(schema, Vec::new())
    }

    pub fn with_records(schema: EntitySchema, records: Vec<Record>) -> Self {
        Self {
            schema,
            state: RwLock::new(MemoryState {
                records,
                ..MemoryState::default()
            }),
        }
    }

    /// Makes the next `count` calls fail with a 503.
    pub async fn fail_next(&self, count: usize) {
        self.state.write().await.fail_next = count;
    }

    /// Number of calls served so far, failed ones included.
    pub async fn calls(&self) -> usize {
        self.state.read().await.calls
    }

    /// Current contents, in insertion order.
    pub async fn records(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }

    fn entity(&self) -> &'static str {
        self.schema.kind.name()
    }

    /// Counts the call and consumes one scheduled failure, if any.
    fn begin_call(state: &mut MemoryState) -> Result<()> {
        state.calls += 1;
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ConsoleError::request(Some(503), "Service Unavailable"));
        }
        Ok(())
    }

    fn position(&self, state: &MemoryState, id: &str) -> Result<usize> {
        state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ConsoleError::not_found(self.entity(), id))
    }
}

/// Splits status flags out of a field map, the way the server stores them.
fn take_status(fields: &mut RecordFields) -> Option<RecordStatus> {
    let is_active = fields.remove("isActive");
    let status = fields.remove("status");
    match (is_active, status) {
        (Some(FieldValue::Bool(active)), _) => Some(RecordStatus::from(active)),
        (_, Some(FieldValue::Text(name))) => Some(match name.to_lowercase().as_str() {
            "active" => RecordStatus::Active,
            "inactive" => RecordStatus::Inactive,
            _ => RecordStatus::Named(name),
        }),
        _ => None,
    }
}

fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>> {
    value
        .as_deref()
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ConsoleError::request(Some(400), format!("{field} must be YYYY-MM-DD, got '{raw}'"))
            })
        })
        .transpose()
}

fn eq_text(value: Option<&FieldValue>, expected: &str) -> bool {
    value.is_some_and(|v| v.to_string().eq_ignore_ascii_case(expected))
}

fn matches_query(record: &Record, query: &ListQuery, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let hit = record
            .fields
            .values()
            .any(|value| value.to_string().to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if let Some(status) = &query.status
        && record.status.filter_value() != status.to_lowercase()
    {
        return false;
    }
    if let Some(category) = &query.category
        && !eq_text(record.field("category"), category)
    {
        return false;
    }
    if query
        .extra
        .iter()
        .any(|(key, value)| !eq_text(record.field(key), value))
    {
        return false;
    }
    let created = record.created_at.date_naive();
    if from.is_some_and(|from| created < from) || to.is_some_and(|to| created > to) {
        return false;
    }
    true
}

fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(FieldValue::Integer(x)), Some(FieldValue::Integer(y))) => x.cmp(y),
        (Some(FieldValue::Float(x)), Some(FieldValue::Float(y))) => x.total_cmp(y),
        (Some(x), Some(y)) => x.to_string().to_lowercase().cmp(&y.to_string().to_lowercase()),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

fn compare_by(a: &Record, b: &Record, field: &str) -> Ordering {
    match field {
        "createdAt" => a.created_at.cmp(&b.created_at),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        "isActive" | "status" => a.status.filter_value().cmp(&b.status.filter_value()),
        other => compare_values(a.field(other), b.field(other)),
    }
}

fn status_summary(records: &[Record]) -> serde_json::Value {
    let mut counts = serde_json::Map::new();
    counts.insert("total".to_string(), records.len().into());
    for record in records {
        let entry = counts
            .entry(record.status.filter_value())
            .or_insert_with(|| 0u64.into());
        *entry = (entry.as_u64().unwrap_or(0) + 1).into();
    }
    serde_json::Value::Object(counts)
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;

        self.schema.check_sort_column(&query.sort_by).map_err(|e| {
            ConsoleError::request(Some(400), e.to_string())
        })?;
        let from = parse_date("dateFrom", &query.date_from)?;
        let to = parse_date("dateTo", &query.date_to)?;

        let mut hits: Vec<&Record> = state
            .records
            .iter()
            .filter(|r| matches_query(r, query, from, to))
            .collect();
        hits.sort_by(|a, b| {
            let ord = compare_by(a, b, &query.sort_by).then_with(|| a.id.cmp(&b.id));
            match query.sort_order {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });

        let limit = query.limit.max(1);
        let total = hits.len() as u64;
        let total_pages = total.div_ceil(limit);
        let offset = query.page_index().saturating_mul(limit);
        let records: Vec<Record> = hits
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        tracing::debug!(
            "[InMemoryRecordSource] {} page {} -> {} of {} records",
            self.schema.resource,
            query.page,
            records.len(),
            total
        );

        Ok(ListPage {
            records,
            pagination: PageMeta {
                total,
                total_pages,
                has_next: query.page < total_pages,
                has_prev: query.page > 1,
            },
            summary: Some(status_summary(&state.records)),
        })
    }

    async fn create(&self, fields: &RecordFields) -> Result<Record> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;

        let mut fields = fields.clone();
        let status = take_status(&mut fields).unwrap_or(RecordStatus::Active);
        let now = Utc::now();
        let record = Record {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
            status,
            created_at: now,
            updated_at: now,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &str, fields: &RecordFields) -> Result<Record> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;
        let index = self.position(&state, id)?;

        let mut fields = fields.clone();
        let status = take_status(&mut fields);
        let record = &mut state.records[index];
        record.fields.extend(fields);
        if let Some(status) = status {
            record.status = status;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;
        let index = self.position(&state, id)?;
        state.records.remove(index);
        Ok(())
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;
        // All or nothing
        for id in ids {
            self.position(&state, id)?;
        }
        state.records.retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn toggle_active(&self, id: &str, value: bool) -> Result<Record> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;
        if !self.schema.supports_toggle {
            return Err(ConsoleError::request(
                Some(405),
                format!("{} records cannot be toggled", self.entity()),
            ));
        }
        let index = self.position(&state, id)?;
        let record = &mut state.records[index];
        record.status = RecordStatus::from(value);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn export(&self, format: ExportFormat, filters: &FilterState) -> Result<ExportHandle> {
        let mut state = self.state.write().await;
        Self::begin_call(&mut state)?;
        let extension = match format {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Json => "json",
        };
        let sort = &filters.sort;
        Ok(ExportHandle {
            download_url: format!(
                "memory://{}/export.{}?sortBy={}&sortOrder={}",
                self.schema.resource, extension, sort.field, sort.direction
            ),
        })
    }
}
