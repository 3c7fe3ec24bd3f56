#[cfg(test)]
mod tests {
    use crate::error::{ConsoleError, Result};
    use crate::list::{FilterKey, FilterState, ListQuery, ListViewModel, LoadStatus, MutationOutcome, SortDirection};
    use crate::record::{
        EntityKind, ExportFormat, ExportHandle, FieldValue, ListPage, PageMeta, Record, RecordFields,
        RecordSource, RecordStatus,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    fn record(id: &str) -> Record {
        let mut fields = RecordFields::new();
        fields.insert("name".to_string(), FieldValue::from(format!("Record {id}")));
        Record {
            id: id.to_string(),
            fields,
            status: RecordStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn page_of(ids: &[&str], total: u64) -> ListPage {
        ListPage {
            records: ids.iter().map(|id| record(id)).collect(),
            pagination: PageMeta {
                total,
                total_pages: 1,
                has_next: false,
                has_prev: false,
            },
            summary: None,
        }
    }

    // Mock RecordSource for testing: paginates a fixed record list and
    // records every request it receives.
    #[derive(Default)]
    struct MockRecordSource {
        records: Mutex<Vec<Record>>,
        queries: Mutex<Vec<ListQuery>>,
        fail_list: Mutex<bool>,
        fail_writes: Mutex<bool>,
        writes: Mutex<Vec<String>>,
        gated: bool,
        pending: Mutex<Vec<oneshot::Sender<ListPage>>>,
    }

    impl MockRecordSource {
        fn with_ids(count: usize) -> Self {
            let records = (0..count).map(|i| record(&format!("r{i}"))).collect();
            Self {
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn gated() -> Self {
            Self {
                gated: true,
                ..Default::default()
            }
        }

        fn last_query(&self) -> ListQuery {
            self.queries.lock().unwrap().last().cloned().unwrap()
        }

        fn list_calls(&self) -> usize {
            self.queries.lock().unwrap().len()
        }

        fn writes(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }

        fn write_result(&self, label: String) -> Result<()> {
            self.writes.lock().unwrap().push(label);
            if *self.fail_writes.lock().unwrap() {
                Err(ConsoleError::request(Some(500), "server exploded"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RecordSource for MockRecordSource {
        async fn list(&self, query: &ListQuery) -> Result<ListPage> {
            self.queries.lock().unwrap().push(query.clone());
            if *self.fail_list.lock().unwrap() {
                return Err(ConsoleError::request(None, "connection refused"));
            }
            if self.gated {
                let (tx, rx) = oneshot::channel();
                self.pending.lock().unwrap().push(tx);
                return rx
                    .await
                    .map_err(|_| ConsoleError::internal("gate dropped"));
            }

            let records = self.records.lock().unwrap();
            let total = records.len() as u64;
            let start = query.page_index().saturating_mul(query.limit) as usize;
            let page: Vec<Record> = records
                .iter()
                .skip(start)
                .take(query.limit as usize)
                .cloned()
                .collect();
            Ok(ListPage {
                records: page,
                pagination: PageMeta {
                    total,
                    total_pages: total.div_ceil(query.limit),
                    has_next: (start as u64).saturating_add(query.limit) < total,
                    has_prev: query.page > 1,
                },
                summary: None,
            })
        }

        async fn create(&self, _fields: &RecordFields) -> Result<Record> {
            self.write_result("create".to_string())?;
            Ok(record("new"))
        }

        async fn update(&self, id: &str, _fields: &RecordFields) -> Result<Record> {
            self.write_result(format!("update:{id}"))?;
            Ok(record(id))
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.write_result(format!("delete:{id}"))?;
            self.records.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }

        async fn bulk_delete(&self, ids: &[String]) -> Result<()> {
            self.write_result(format!("bulk:{}", ids.join(",")))?;
            self.records.lock().unwrap().retain(|r| !ids.contains(&r.id));
            Ok(())
        }

        async fn toggle_active(&self, id: &str, value: bool) -> Result<Record> {
            self.write_result(format!("toggle:{id}:{value}"))?;
            Ok(record(id))
        }

        async fn export(&self, format: ExportFormat, _filters: &FilterState) -> Result<ExportHandle> {
            self.write_result(format!("export:{format}"))?;
            Ok(ExportHandle {
                download_url: format!("https://files.example.com/export.{format}"),
            })
        }
    }

    fn view_model(kind: EntityKind, source: Arc<MockRecordSource>, page_size: u64) -> ListViewModel {
        ListViewModel::new(kind.schema(), source, page_size)
    }

    #[tokio::test]
    async fn test_set_filter_always_resets_page() {
        let source = Arc::new(MockRecordSource::with_ids(50));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        for (key, value) in [("search", "bill"), ("status", "active"), ("category", "crm"), ("search", "")] {
            vm.set_page(3).await;
            assert_eq!(vm.pagination().await.page, 3);

            vm.set_filter(key, value).await.unwrap();
            assert_eq!(vm.pagination().await.page, 0);
            assert_eq!(source.last_query().page, 1);
        }

        let filters = vm.filters().await;
        assert_eq!(filters.status, "active");
        assert_eq!(filters.category, "crm");
        assert!(filters.search.is_empty());
    }

    #[tokio::test]
    async fn test_set_filter_rejects_paging_and_sort_keys() {
        let source = Arc::new(MockRecordSource::with_ids(5));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        for (key, value) in [("sortBy", "passwordHash"), ("page", "99"), ("limit", "1000"), ("sortOrder", "up")] {
            assert!(vm.set_filter(key, value).await.unwrap_err().is_validation());
        }
        assert_eq!(source.list_calls(), 0);
        assert!(vm.filters().await.extra.is_empty());

        let mut filters = FilterState::defaults_for(&EntityKind::Module.schema());
        filters.extra.insert("sortBy".to_string(), "passwordHash".to_string());
        assert!(vm.restore(filters, 0).await.unwrap_err().is_validation());
        assert_eq!(source.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_filters_restores_defaults() {
        let source = Arc::new(MockRecordSource::with_ids(5));
        let vm = view_model(EntityKind::Organization, source.clone(), 10);

        vm.set_filter(FilterKey::from("country"), "India").await.unwrap();
        vm.set_sort("name").await.unwrap();
        vm.clear_filters().await;

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.filters, FilterState::defaults_for(&EntityKind::Organization.schema()));
        assert_eq!(snapshot.pagination.page, 0);
        assert!(source.last_query().extra.is_empty());
    }

    #[tokio::test]
    async fn test_set_sort_toggles_once_per_call() {
        let source = Arc::new(MockRecordSource::with_ids(3));
        let vm = view_model(EntityKind::Template, source.clone(), 10);

        let expected = [
            SortDirection::Ascending,
            SortDirection::Descending,
            SortDirection::Ascending,
            SortDirection::Descending,
        ];
        for direction in expected {
            vm.set_sort("language").await.unwrap();
            assert_eq!(vm.filters().await.sort.direction, direction);
            assert_eq!(source.last_query().sort_order, direction);
        }
    }

    #[tokio::test]
    async fn test_restore_issues_a_single_request() {
        let source = Arc::new(MockRecordSource::with_ids(40));
        let vm = view_model(EntityKind::Organization, source.clone(), 10);

        let mut filters = FilterState::defaults_for(&EntityKind::Organization.schema());
        filters.set(FilterKey::Search, "acme");
        filters.set(FilterKey::from("country"), "India");
        filters.apply_sort("name");
        vm.restore(filters.clone(), 2).await.unwrap();

        assert_eq!(source.list_calls(), 1);
        let query = source.last_query();
        assert_eq!(query.page, 3);
        assert_eq!(query.search.as_deref(), Some("acme"));
        assert_eq!(query.sort_by, "name");
        assert_eq!(vm.filters().await, filters);

        filters.sort.field = "passwordHash".to_string();
        assert!(vm.restore(filters, 0).await.unwrap_err().is_validation());
        assert_eq!(source.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_set_sort_rejects_unknown_column_without_request() {
        let source = Arc::new(MockRecordSource::with_ids(3));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        let err = vm.set_sort("passwordHash").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(source.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_set_page_size_resets_to_first_page() {
        let source = Arc::new(MockRecordSource::with_ids(100));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        vm.set_page(3).await;
        assert_eq!(source.last_query().page, 4);

        vm.set_page_size(25).await.unwrap();
        let query = source.last_query();
        assert_eq!(vm.pagination().await.page, 0);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 25);

        assert!(vm.set_page_size(0).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_out_of_range_page_clamps_to_last_page() {
        let source = Arc::new(MockRecordSource::with_ids(23));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        vm.set_page(9).await;

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.pagination.page, 2);
        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.status, LoadStatus::Loaded);
        assert_eq!(source.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_huge_page_index_clamps_instead_of_overflowing() {
        let source = Arc::new(MockRecordSource::with_ids(23));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        vm.set_page(u64::MAX).await;

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.pagination.page, 2);
        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.status, LoadStatus::Loaded);
        assert_eq!(source.last_query().page, 3);
    }

    #[tokio::test]
    async fn test_overlapping_out_of_range_reloads_still_clamp() {
        let source = Arc::new(MockRecordSource::gated());
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        let driver = async {
            while source.pending.lock().unwrap().len() < 2 {
                tokio::task::yield_now().await;
            }
            let (older, newer) = {
                let mut pending = source.pending.lock().unwrap();
                let newer = pending.pop().unwrap();
                let older = pending.pop().unwrap();
                (older, newer)
            };

            // Both requests were for page 9 of 23 records
            older.send(page_of(&[], 23)).unwrap();
            while vm.pagination().await.page != 2 {
                tokio::task::yield_now().await;
            }
            assert_eq!(vm.status().await, LoadStatus::Loading);
            newer.send(page_of(&[], 23)).unwrap();

            // The newer response triggers the follow-up load of the last page
            while source.pending.lock().unwrap().is_empty() {
                tokio::task::yield_now().await;
            }
            let follow_up = source.pending.lock().unwrap().pop().unwrap();
            follow_up.send(page_of(&["r20", "r21", "r22"], 23)).unwrap();
        };

        tokio::join!(vm.set_page(9), vm.set_page(9), driver);

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.pagination.page, 2);
        assert_eq!(snapshot.records.len(), 3);
        assert_eq!(snapshot.status, LoadStatus::Loaded);
        assert_eq!(source.list_calls(), 3);
        assert_eq!(source.last_query().page, 3);
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_page() {
        let source = Arc::new(MockRecordSource::with_ids(4));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        vm.reload().await;
        assert_eq!(vm.records().await.len(), 4);
        vm.take_notifications().await;

        *source.fail_list.lock().unwrap() = true;
        vm.reload().await;

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Error);
        assert_eq!(snapshot.records.len(), 4);
        assert!(snapshot.error.unwrap().is_request_failure());
        assert_eq!(vm.take_notifications().await.len(), 1);

        *source.fail_list.lock().unwrap() = false;
        vm.reload().await;
        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Loaded);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_reload_never_overwrites_newer_one() {
        let source = Arc::new(MockRecordSource::gated());
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        let driver = async {
            // Wait until both requests are in flight; gates are in issue order
            while source.pending.lock().unwrap().len() < 2 {
                tokio::task::yield_now().await;
            }
            let (older, newer) = {
                let mut pending = source.pending.lock().unwrap();
                let newer = pending.pop().unwrap();
                let older = pending.pop().unwrap();
                (older, newer)
            };

            newer.send(page_of(&["fresh"], 1)).unwrap();
            while vm.status().await != LoadStatus::Loaded {
                tokio::task::yield_now().await;
            }
            older.send(page_of(&["stale-1", "stale-2"], 2)).unwrap();
        };

        tokio::join!(vm.reload(), vm.reload(), driver);

        let snapshot = vm.snapshot().await;
        let ids: Vec<&str> = snapshot.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fresh"]);
        assert_eq!(snapshot.pagination.total, 1);
        assert_eq!(snapshot.status, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_older_response_arriving_first_is_shown_until_newer_lands() {
        let source = Arc::new(MockRecordSource::gated());
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        let driver = async {
            while source.pending.lock().unwrap().len() < 2 {
                tokio::task::yield_now().await;
            }
            let (older, newer) = {
                let mut pending = source.pending.lock().unwrap();
                let newer = pending.pop().unwrap();
                let older = pending.pop().unwrap();
                (older, newer)
            };

            older.send(page_of(&["older"], 1)).unwrap();
            while vm.records().await.is_empty() {
                tokio::task::yield_now().await;
            }
            // Still waiting on the newer request
            assert_eq!(vm.status().await, LoadStatus::Loading);
            newer.send(page_of(&["newer"], 1)).unwrap();
        };

        tokio::join!(vm.reload(), vm.reload(), driver);

        let records = vm.records().await;
        assert_eq!(records[0].id, "newer");
        assert_eq!(vm.status().await, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_select_all_on_page_toggles() {
        let source = Arc::new(MockRecordSource::with_ids(15));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        vm.reload().await;

        let before = vm.selection().await;
        vm.select_all_on_page().await;
        assert_eq!(vm.selection().await.len(), 10);
        vm.select_all_on_page().await;
        assert_eq!(vm.selection().await, before);
    }

    #[tokio::test]
    async fn test_toggle_selection_ignores_ids_off_page() {
        let source = Arc::new(MockRecordSource::with_ids(15));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        vm.reload().await;

        assert!(vm.toggle_selection("r1").await);
        assert!(!vm.toggle_selection("r12").await);
        assert_eq!(vm.selection().await.to_vec(), vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_page_change_prunes_selection() {
        let source = Arc::new(MockRecordSource::with_ids(15));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        vm.reload().await;
        vm.toggle_selection("r2").await;

        vm.set_page(1).await;
        assert!(vm.selection().await.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_delete_success_removes_exactly_deleted_ids() {
        let source = Arc::new(MockRecordSource::with_ids(6));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        vm.reload().await;
        for id in ["r0", "r1", "r2"] {
            vm.toggle_selection(id).await;
        }

        let outcome = vm
            .bulk_delete(&["r0".to_string(), "r2".to_string()])
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(vm.selection().await.to_vec(), vec!["r1".to_string()]);
        assert_eq!(vm.records().await.len(), 4);
        assert_eq!(source.writes(), vec!["bulk:r0,r2".to_string()]);
    }

    #[tokio::test]
    async fn test_bulk_delete_failure_leaves_selection() {
        let source = Arc::new(MockRecordSource::with_ids(6));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        vm.reload().await;
        vm.toggle_selection("r0").await;
        vm.toggle_selection("r1").await;
        vm.take_notifications().await;
        *source.fail_writes.lock().unwrap() = true;

        let outcome = vm.delete_selected().await.unwrap();

        assert!(matches!(outcome, MutationOutcome::Failed(ConsoleError::Request { .. })));
        assert_eq!(vm.selection().await.len(), 2);
        assert_eq!(vm.records().await.len(), 6);
        let notifications = vm.take_notifications().await;
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_rejects_empty_batch() {
        let source = Arc::new(MockRecordSource::with_ids(2));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        assert!(vm.bulk_delete(&[]).await.unwrap_err().is_validation());
        assert!(source.writes().is_empty());
    }

    #[tokio::test]
    async fn test_create_validates_before_any_request() {
        let source = Arc::new(MockRecordSource::with_ids(2));
        let vm = view_model(EntityKind::Module, source.clone(), 10);

        let mut fields = RecordFields::new();
        fields.insert("name".to_string(), FieldValue::from("Billing"));
        let err = vm.create(fields.clone()).await.unwrap_err();

        assert_eq!(err, ConsoleError::validation("category", "is required"));
        assert!(source.writes().is_empty());
        assert_eq!(source.list_calls(), 0);

        fields.insert("category".to_string(), FieldValue::from("finance"));
        let outcome = vm.create(fields).await.unwrap();
        assert_eq!(outcome.into_option().map(|r| r.id), Some("new".to_string()));
        assert_eq!(source.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_still_reloads() {
        let source = Arc::new(MockRecordSource::with_ids(2));
        let vm = view_model(EntityKind::Module, source.clone(), 10);
        *source.fail_writes.lock().unwrap() = true;

        let mut fields = RecordFields::new();
        fields.insert("description".to_string(), FieldValue::from("new text"));
        let outcome = vm.update("r1", fields).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(source.list_calls(), 1);
        assert_eq!(vm.status().await, LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_toggle_active_only_for_modules() {
        let source = Arc::new(MockRecordSource::with_ids(2));
        let templates = view_model(EntityKind::Template, source.clone(), 10);
        assert!(templates.toggle_active("r0", false).await.unwrap_err().is_validation());

        let modules = view_model(EntityKind::Module, source.clone(), 10);
        let outcome = modules.toggle_active("r0", false).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(source.writes(), vec!["toggle:r0:false".to_string()]);

        let notifications = modules.take_notifications().await;
        assert_eq!(notifications[0].message, "Module deactivated");
    }

    #[tokio::test]
    async fn test_export_returns_download_url() {
        let source = Arc::new(MockRecordSource::with_ids(2));
        let vm = view_model(EntityKind::Organization, source.clone(), 10);

        let handle = vm.export(ExportFormat::Csv).await.into_option().unwrap();
        assert_eq!(handle.download_url, "https://files.example.com/export.csv");
        assert_eq!(source.list_calls(), 0);
    }
}
