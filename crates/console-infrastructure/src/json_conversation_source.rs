//! File-backed `ConversationSource`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use console_core::conversation::{Conversation, ConversationSource};
use console_core::{ConsoleError, Result};

/// Fixture files hold either a bare array or `{ "conversations": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConversationFile {
    Wrapped { conversations: Vec<Conversation> },
    Bare(Vec<Conversation>),
}

/// Loads the inbox from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonConversationSource {
    path: PathBuf,
}

impl JsonConversationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConversationSource for JsonConversationSource {
    async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ConsoleError::Io {
                message: format!("Failed to read {:?}: {}", self.path, e),
            }
        })?;
        let file: ConversationFile = serde_json::from_str(&content)?;
        let conversations = match file {
            ConversationFile::Wrapped { conversations } => conversations,
            ConversationFile::Bare(conversations) => conversations,
        };
        tracing::info!(
            "[JsonConversationSource] Loaded {} conversations from {:?}",
            conversations.len(),
            self.path
        );
        Ok(conversations)
    }
}

/// Writes conversations as a fixture file the source can read back.
pub async fn write_conversations(path: &Path, conversations: &[Conversation]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(conversations)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
