use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use console_core::config::ConsoleConfig;
use console_core::conversation::ConversationSource;
use console_core::list::ListViewModel;
use console_core::record::{EntityKind, LookupSource, RecordSource};
use console_infrastructure::json_conversation_source::write_conversations;
use console_infrastructure::{
    ApiClient, ConfigService, ConsolePaths, DemoLookupSource, HttpLookupSource, HttpRecordSource,
    InMemoryRecordSource, JsonConversationSource, demo,
};

/// Wires sources for one CLI invocation: the admin API, or demo data with
/// `--offline`.
pub struct AppContext {
    pub config: ConsoleConfig,
    pub paths: ConsolePaths,
    offline: bool,
    client: Option<Arc<ApiClient>>,
}

impl AppContext {
    pub fn load(offline: bool, config_dir: Option<PathBuf>) -> Result<Self> {
        let paths = ConsolePaths::new(config_dir);
        let config = ConfigService::new(&paths)?
            .get_config()
            .context("Failed to load configuration")?;

        let client = if offline {
            None
        } else {
            Some(Arc::new(ApiClient::new(&config.api)?))
        };

        Ok(Self {
            config,
            paths,
            offline,
            client,
        })
    }

    fn client(&self) -> Result<Arc<ApiClient>> {
        self.client
            .clone()
            .context("No API client in offline mode")
    }

    pub fn record_source(&self, kind: EntityKind) -> Result<Arc<dyn RecordSource>> {
        if self.offline {
            tracing::debug!("[AppContext] Using demo {} records", kind);
            return Ok(Arc::new(InMemoryRecordSource::with_records(
                kind.schema(),
                demo::records(kind),
            )));
        }
        Ok(Arc::new(HttpRecordSource::new(self.client()?, kind.schema())))
    }

    pub fn lookup_source(&self) -> Result<Arc<dyn LookupSource>> {
        if self.offline {
            return Ok(Arc::new(DemoLookupSource));
        }
        Ok(Arc::new(HttpLookupSource::new(self.client()?)))
    }

    /// List view model for `kind`. `page_size` falls back to the configured
    /// default.
    pub fn list_view_model(&self, kind: EntityKind, page_size: Option<u64>) -> Result<ListViewModel> {
        let page_size = page_size.unwrap_or(self.config.list.default_page_size);
        Ok(ListViewModel::new(kind.schema(), self.record_source(kind)?, page_size))
    }

    /// Inbox source. Without an explicit or configured file, the default
    /// fixture under the data directory is used, seeded with demo
    /// conversations on first run.
    pub async fn conversation_source(&self, file: Option<PathBuf>) -> Result<Arc<dyn ConversationSource>> {
        let explicit = file.or_else(|| self.config.chat.conversations_file.clone());
        let path = match explicit {
            Some(path) => path,
            None => {
                let path = self.paths.default_conversations_file()?;
                if !path.exists() {
                    write_conversations(&path, &demo::conversations()).await?;
                    tracing::info!("[AppContext] Seeded demo inbox at {:?}", path);
                }
                path
            }
        };
        Ok(Arc::new(JsonConversationSource::new(path)))
    }
}
