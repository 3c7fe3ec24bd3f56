use super::filter::{FilterKey, FilterState};
use super::notification::{Notification, NotificationQueue};
use super::pagination::PaginationState;
use super::query::ListQuery;
use super::selection::SelectionSet;
use crate::error::{ConsoleError, Result};
use crate::record::{
    EntitySchema, ExportFormat, ExportHandle, ListPage, Record, RecordFields, RecordSource,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Load state of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Result of a write issued by the view model.
///
/// Request failures are not propagated as `Err`; they are reported here and
/// as an error notification so the screen is never left half-updated.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T = ()> {
    Succeeded(T),
    Failed(ConsoleError),
}

impl<T> MutationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Succeeded(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            MutationOutcome::Succeeded(value) => Some(value),
            MutationOutcome::Failed(_) => None,
        }
    }
}

/// Everything the presentation layer renders from, cloned out of the view
/// model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    pub filters: FilterState,
    pub pagination: PaginationState,
    pub selection: SelectionSet,
    pub records: Vec<Record>,
    pub summary: Option<serde_json::Value>,
    pub status: LoadStatus,
    pub error: Option<ConsoleError>,
}

struct ListState {
    filters: FilterState,
    pagination: PaginationState,
    selection: SelectionSet,
    records: Vec<Record>,
    summary: Option<serde_json::Value>,
    status: LoadStatus,
    error: Option<ConsoleError>,
    notifications: NotificationQueue,
    /// Sequence number of the most recently issued reload
    issued_seq: u64,
    /// Sequence number of the newest reload whose response was applied
    applied_seq: u64,
}

enum ReloadOutcome {
    Applied,
    Failed,
    Discarded,
    /// The requested page was past the end; the page index was clamped and
    /// another load is needed.
    Clamped,
}

/// View model behind one record management screen.
///
/// `ListViewModel` is responsible for:
/// - Holding filter, pagination and selection state
/// - Reloading the current page whenever that state changes
/// - Discarding reload responses that were superseded by a newer reload
/// - Issuing single and bulk writes and resynchronizing afterwards
///
/// All methods take `&self`; overlapping calls (e.g. two reloads triggered
/// by rapid typing) are allowed and ordered by sequence number.
pub struct ListViewModel {
    schema: EntitySchema,
    source: Arc<dyn RecordSource>,
    state: RwLock<ListState>,
}

impl ListViewModel {
    /// Creates an idle view model. Nothing is fetched until `reload` or a
    /// mutator is called.
    ///
    /// # Arguments
    ///
    /// * `schema` - The entity contract (resource, sort columns, required fields)
    /// * `source` - Record source bound to the same entity type
    /// * `page_size` - Initial page size
    pub fn new(schema: EntitySchema, source: Arc<dyn RecordSource>, page_size: u64) -> Self {
        let filters = FilterState::defaults_for(&schema);
        Self {
            schema,
            source,
            state: RwLock::new(ListState {
                filters,
                pagination: PaginationState::new(page_size),
                selection: SelectionSet::new(),
                records: Vec::new(),
                summary: None,
                status: LoadStatus::Idle,
                error: None,
                notifications: NotificationQueue::default(),
                issued_seq: 0,
                applied_seq: 0,
            }),
        }
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    // ============================================================================
    // Read accessors
    // ============================================================================

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.read().await;
        ListSnapshot {
            filters: state.filters.clone(),
            pagination: state.pagination.clone(),
            selection: state.selection.clone(),
            records: state.records.clone(),
            summary: state.summary.clone(),
            status: state.status,
            error: state.error.clone(),
        }
    }

    pub async fn records(&self) -> Vec<Record> {
        self.state.read().await.records.clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.state.read().await.filters.clone()
    }

    pub async fn pagination(&self) -> PaginationState {
        self.state.read().await.pagination.clone()
    }

    pub async fn selection(&self) -> SelectionSet {
        self.state.read().await.selection.clone()
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status
    }

    pub async fn error(&self) -> Option<ConsoleError> {
        self.state.read().await.error.clone()
    }

    /// Drains the pending notifications, oldest first.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        self.state.write().await.notifications.drain()
    }

    // ============================================================================
    // Filter / sort / pagination mutators
    // ============================================================================

    /// Merges one filter value, returns to the first page and reloads.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and does not reload) for a blank extra
    /// key or one that names a paging or sorting parameter.
    pub async fn set_filter(&self, key: impl Into<FilterKey>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        key.check()?;
        {
            let mut state = self.state.write().await;
            state.filters.set(key, value);
            state.pagination.page = 0;
        }
        self.reload().await;
        Ok(())
    }

    /// Restores default filters and sort, returns to the first page and
    /// reloads.
    pub async fn clear_filters(&self) {
        {
            let mut state = self.state.write().await;
            state.filters = FilterState::defaults_for(&self.schema);
            state.pagination.page = 0;
        }
        self.reload().await;
    }

    /// Replaces filters, sort and page index in one step and reloads once,
    /// e.g. when restoring a saved view.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and does not reload) when the sort
    /// column is not one of the schema's sort columns or an extra filter
    /// key is reserved.
    pub async fn restore(&self, filters: FilterState, page: u64) -> Result<()> {
        self.schema.check_sort_column(&filters.sort.field)?;
        filters.check_extras()?;
        {
            let mut state = self.state.write().await;
            state.filters = filters;
            state.pagination.page = page;
        }
        self.reload().await;
        Ok(())
    }

    /// Sort header click: the same column toggles the direction, a new
    /// column starts ascending.
    ///
    /// # Errors
    ///
    /// Returns a validation error (and does not reload) when `field` is not
    /// one of the schema's sort columns.
    pub async fn set_sort(&self, field: &str) -> Result<()> {
        self.schema.check_sort_column(field)?;
        {
            let mut state = self.state.write().await;
            state.filters.apply_sort(field);
        }
        self.reload().await;
        Ok(())
    }

    /// Jumps to a zero-based page and reloads. A page past the end is
    /// clamped when the response reveals the real total.
    pub async fn set_page(&self, index: u64) {
        {
            let mut state = self.state.write().await;
            state.pagination.page = index;
        }
        self.reload().await;
    }

    /// Changes the page size, returns to the first page and reloads.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a size of zero.
    pub async fn set_page_size(&self, size: u64) -> Result<()> {
        if size == 0 {
            return Err(ConsoleError::validation("limit", "page size must be positive"));
        }
        {
            let mut state = self.state.write().await;
            state.pagination.page_size = size;
            state.pagination.page = 0;
        }
        self.reload().await;
        Ok(())
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Fetches the current page with the full filter and pagination state.
    ///
    /// On success the records, pagination metadata and summary are
    /// replaced. On failure the error state is set and the previously
    /// displayed page stays visible. A response from a reload that was
    /// superseded by a newer one is discarded.
    pub async fn reload(&self) {
        // One follow-up load at most: the clamped page is always in range
        // unless the data shrank again in between.
        for _ in 0..2 {
            let (seq, requested_page, query) = self.begin_reload().await;
            let result = self.source.list(&query).await;
            match self.finish_reload(seq, requested_page, result).await {
                ReloadOutcome::Clamped => continue,
                ReloadOutcome::Applied | ReloadOutcome::Failed | ReloadOutcome::Discarded => {
                    return;
                }
            }
        }
    }

    /// Issues a sequence number and captures the page index the request is
    /// for.
    async fn begin_reload(&self) -> (u64, u64, ListQuery) {
        let mut state = self.state.write().await;
        state.issued_seq += 1;
        state.status = LoadStatus::Loading;
        let query = ListQuery::new(&state.filters, &state.pagination);
        tracing::debug!(
            "[ListViewModel:{}] reload #{} issued (page {}, limit {})",
            self.schema.kind,
            state.issued_seq,
            query.page,
            query.limit
        );
        (state.issued_seq, state.pagination.page, query)
    }

    async fn finish_reload(
        &self,
        seq: u64,
        requested_page: u64,
        result: Result<ListPage>,
    ) -> ReloadOutcome {
        let mut state = self.state.write().await;

        if seq <= state.applied_seq {
            tracing::debug!(
                "[ListViewModel:{}] reload #{} discarded (already showing #{})",
                self.schema.kind,
                seq,
                state.applied_seq
            );
            return ReloadOutcome::Discarded;
        }
        state.applied_seq = seq;
        let settled = seq == state.issued_seq;

        match result {
            Ok(page) => {
                state.pagination.apply_meta(&page.pagination);

                // Judged against the page this response was requested for: an
                // overlapping reload may already have clamped the current index.
                if page.records.is_empty() && state.pagination.is_page_out_of_range(requested_page) {
                    let last = state.pagination.last_valid_page();
                    if state.pagination.page == requested_page {
                        tracing::info!(
                            "[ListViewModel:{}] page {} is past the end ({} records), clamping to {}",
                            self.schema.kind,
                            requested_page,
                            state.pagination.total,
                            last
                        );
                        state.pagination.page = last;
                    }
                    // A newer reload still in flight issues the follow-up load.
                    return if settled {
                        ReloadOutcome::Clamped
                    } else {
                        ReloadOutcome::Discarded
                    };
                }

                let ListPage {
                    records,
                    pagination: _,
                    summary,
                } = page;
                let page_ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
                state.selection.retain_page(page_ids);
                state.records = records;
                state.summary = summary;
                state.error = None;
                state.status = if settled {
                    LoadStatus::Loaded
                } else {
                    LoadStatus::Loading
                };
                tracing::debug!(
                    "[ListViewModel:{}] reload #{} applied ({} records, total {})",
                    self.schema.kind,
                    seq,
                    state.records.len(),
                    state.pagination.total
                );
                ReloadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(
                    "[ListViewModel:{}] reload #{} failed: {}",
                    self.schema.kind,
                    seq,
                    err
                );
                state
                    .notifications
                    .push(Notification::error(format!("Failed to load {}s: {}", self.schema.kind, err)));
                state.error = Some(err);
                state.status = if settled {
                    LoadStatus::Error
                } else {
                    LoadStatus::Loading
                };
                ReloadOutcome::Failed
            }
        }
    }

    // ============================================================================
    // Selection
    // ============================================================================

    /// Flips the selection of a record on the loaded page. Returns whether
    /// it is selected afterwards; ids not on the page are ignored.
    pub async fn toggle_selection(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.records.iter().any(|r| r.id == id) {
            tracing::debug!(
                "[ListViewModel:{}] ignoring selection of '{}' (not on page)",
                self.schema.kind,
                id
            );
            return false;
        }
        state.selection.toggle(id)
    }

    /// "Select all on page" checkbox. Not a cross-page select-everything.
    pub async fn select_all_on_page(&self) {
        let mut state = self.state.write().await;
        let ListState {
            records, selection, ..
        } = &mut *state;
        let page_ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        selection.toggle_all(&page_ids);
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    // ============================================================================
    // Writes
    // ============================================================================

    /// Deletes a batch of records in one request.
    ///
    /// On success exactly `ids` leave the selection and the page reloads.
    /// On failure the selection is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty batch.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<MutationOutcome> {
        if ids.is_empty() {
            return Err(ConsoleError::invalid("No records selected"));
        }

        match self.source.bulk_delete(ids).await {
            Ok(()) => {
                tracing::info!(
                    "[ListViewModel:{}] bulk deleted {} records",
                    self.schema.kind,
                    ids.len()
                );
                {
                    let mut state = self.state.write().await;
                    state.selection.remove_all(ids);
                    state.notifications.push(Notification::success(format!(
                        "Deleted {} {}s",
                        ids.len(),
                        self.schema.kind
                    )));
                }
                self.reload().await;
                Ok(MutationOutcome::Succeeded(()))
            }
            Err(err) => {
                self.report_failure("bulk delete", &err).await;
                Ok(MutationOutcome::Failed(err))
            }
        }
    }

    /// Deletes the currently selected records.
    pub async fn delete_selected(&self) -> Result<MutationOutcome> {
        let ids = self.selection().await.to_vec();
        self.bulk_delete(&ids).await
    }

    /// Creates a record after checking required fields locally.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without any request, when a required
    /// field is missing or blank.
    pub async fn create(&self, fields: RecordFields) -> Result<MutationOutcome<Record>> {
        self.schema.validate_create(&fields)?;
        let result = self.source.create(&fields).await;
        Ok(self.finish_write("create", "created", result).await)
    }

    /// Updates a record after checking that no required field is blanked.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without any request, for an empty id,
    /// no fields, or a blanked required field.
    pub async fn update(&self, id: &str, fields: RecordFields) -> Result<MutationOutcome<Record>> {
        require_id(id)?;
        self.schema.validate_update(&fields)?;
        let result = self.source.update(id, &fields).await;
        Ok(self.finish_write("update", "updated", result).await)
    }

    /// Deletes a single record.
    pub async fn delete(&self, id: &str) -> Result<MutationOutcome> {
        require_id(id)?;
        let result = self.source.delete(id).await;
        if result.is_ok() {
            self.state.write().await.selection.remove_all(&[id.to_string()]);
        }
        Ok(self.finish_write("delete", "deleted", result).await)
    }

    /// Sets a record's active flag.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the entity type has no toggle
    /// endpoint.
    pub async fn toggle_active(&self, id: &str, next: bool) -> Result<MutationOutcome<Record>> {
        require_id(id)?;
        if !self.schema.supports_toggle {
            return Err(ConsoleError::invalid(format!(
                "{}s cannot be activated or deactivated",
                self.schema.kind
            )));
        }
        let verb = if next { "activated" } else { "deactivated" };
        let result = self.source.toggle_active(id, next).await;
        Ok(self.finish_write("toggle", verb, result).await)
    }

    /// Requests an export of everything matching the current filters.
    pub async fn export(&self, format: ExportFormat) -> MutationOutcome<ExportHandle> {
        let filters = self.filters().await;
        match self.source.export(format, &filters).await {
            Ok(handle) => {
                tracing::info!(
                    "[ListViewModel:{}] export ready: {}",
                    self.schema.kind,
                    handle.download_url
                );
                self.state
                    .write()
                    .await
                    .notifications
                    .push(Notification::success(format!("Export ({format}) is ready")));
                MutationOutcome::Succeeded(handle)
            }
            Err(err) => {
                self.report_failure("export", &err).await;
                MutationOutcome::Failed(err)
            }
        }
    }

    /// Notifies and reloads after a single-record write, whatever its
    /// outcome: a failed write may still have partially applied server-side.
    async fn finish_write<T>(&self, action: &str, verb: &str, result: Result<T>) -> MutationOutcome<T> {
        let outcome = match result {
            Ok(value) => {
                tracing::info!("[ListViewModel:{}] {} succeeded", self.schema.kind, action);
                self.state
                    .write()
                    .await
                    .notifications
                    .push(Notification::success(format!("{} {}", capitalize(self.schema.kind.name()), verb)));
                MutationOutcome::Succeeded(value)
            }
            Err(err) => {
                self.report_failure(action, &err).await;
                MutationOutcome::Failed(err)
            }
        };
        self.reload().await;
        outcome
    }

    async fn report_failure(&self, action: &str, err: &ConsoleError) {
        tracing::error!("[ListViewModel:{}] {} failed: {}", self.schema.kind, action, err);
        self.state
            .write()
            .await
            .notifications
            .push(Notification::error(format!("Failed to {} {}: {}", action, self.schema.kind, err)));
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(ConsoleError::validation("id", "must not be empty"))
    } else {
        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
