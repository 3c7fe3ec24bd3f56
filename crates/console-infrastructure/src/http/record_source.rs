//! REST-backed `RecordSource`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;

use console_core::list::{FilterState, ListQuery};
use console_core::record::{
    EntitySchema, ExportFormat, ExportHandle, ListPage, Record, RecordFields, RecordSource,
};
use console_core::{ConsoleError, Result};

use super::client::{ApiClient, not_found_as};
use crate::dto::{ExportDto, ListResponseDto, RecordDto};

#[derive(Serialize)]
struct BulkDeleteRequest<'a> {
    ids: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleActiveRequest {
    is_active: bool,
}

#[derive(Serialize)]
struct ExportRequest<'a> {
    format: ExportFormat,
    filters: &'a FilterState,
}

/// Talks to `{base}/{resource}` for one entity schema.
pub struct HttpRecordSource {
    client: Arc<ApiClient>,
    schema: EntitySchema,
}

impl HttpRecordSource {
    pub fn new(client: Arc<ApiClient>, schema: EntitySchema) -> Self {
        Self { client, schema }
    }

    fn resource(&self) -> &str {
        &self.schema.resource
    }

    fn entity(&self) -> &'static str {
        self.schema.kind.name()
    }

    fn body(fields: &RecordFields) -> Result<JsonValue> {
        Ok(serde_json::to_value(fields)?)
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        tracing::debug!(
            "[HttpRecordSource] GET {} page={} limit={}",
            self.schema.resource,
            query.page,
            query.limit
        );
        let response: ListResponseDto = self
            .client
            .get_json(&[self.resource()], &query.to_query_pairs())
            .await?;
        Ok(response.into_page(query.limit))
    }

    async fn create(&self, fields: &RecordFields) -> Result<Record> {
        let body = Self::body(fields)?;
        let dto: RecordDto = self
            .client
            .send_json(Method::POST, &[self.resource()], Some(&body))
            .await?;
        Ok(dto.into())
    }

    async fn update(&self, id: &str, fields: &RecordFields) -> Result<Record> {
        let body = Self::body(fields)?;
        let dto: RecordDto = self
            .client
            .send_json(Method::PUT, &[self.resource(), id], Some(&body))
            .await
            .map_err(|e| not_found_as(e, self.entity(), id))?;
        Ok(dto.into())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .send_empty::<JsonValue>(Method::DELETE, &[self.resource(), id], None)
            .await
            .map_err(|e| not_found_as(e, self.entity(), id))
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<()> {
        self.client
            .send_empty(
                Method::POST,
                &[self.resource(), "bulk-delete"],
                Some(&BulkDeleteRequest { ids }),
            )
            .await
    }

    async fn toggle_active(&self, id: &str, value: bool) -> Result<Record> {
        if !self.schema.supports_toggle {
            return Err(ConsoleError::invalid(format!(
                "{} records cannot be toggled",
                self.entity()
            )));
        }
        let dto: RecordDto = self
            .client
            .send_json(
                Method::PATCH,
                &[self.resource(), id, "toggle-active"],
                Some(&ToggleActiveRequest { is_active: value }),
            )
            .await
            .map_err(|e| not_found_as(e, self.entity(), id))?;
        Ok(dto.into())
    }

    async fn export(&self, format: ExportFormat, filters: &FilterState) -> Result<ExportHandle> {
        let dto: ExportDto = self
            .client
            .send_json(
                Method::POST,
                &[self.resource(), "export"],
                Some(&ExportRequest { format, filters }),
            )
            .await?;
        Ok(dto.into())
    }
}
