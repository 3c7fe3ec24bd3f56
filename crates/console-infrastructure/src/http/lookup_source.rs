//! REST-backed `LookupSource`.

use std::sync::Arc;

use async_trait::async_trait;

use console_core::Result;
use console_core::record::{EntityKind, LookupSource};

use super::client::ApiClient;
use crate::dto::LookupItemDto;

/// Reads filter dropdown values from `{base}/lookups/...`.
pub struct HttpLookupSource {
    client: Arc<ApiClient>,
}

impl HttpLookupSource {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, list: &str, query: &[(String, String)]) -> Result<Vec<String>> {
        tracing::debug!("[HttpLookupSource] GET lookups/{} {:?}", list, query);
        let items: Vec<LookupItemDto> = self.client.get_json(&["lookups", list], query).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LookupSource for HttpLookupSource {
    async fn categories(&self, kind: EntityKind) -> Result<Vec<String>> {
        self.fetch("categories", &[("type".to_string(), kind.name().to_string())])
            .await
    }

    async fn countries(&self) -> Result<Vec<String>> {
        self.fetch("countries", &[]).await
    }

    async fn states(&self, country: &str) -> Result<Vec<String>> {
        self.fetch("states", &[("country".to_string(), country.to_string())])
            .await
    }

    async fn cities(&self, state: &str) -> Result<Vec<String>> {
        self.fetch("cities", &[("state".to_string(), state.to_string())])
            .await
    }

    async fn languages(&self) -> Result<Vec<String>> {
        self.fetch("languages", &[]).await
    }
}
