//! Conversation source trait.
//!
//! Defines where the inbox is loaded from (a fixture file today, a
//! messaging backend eventually).

use super::model::Conversation;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract source of conversations for the chat inbox.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Loads every conversation visible to the operator, with history.
    async fn load_conversations(&self) -> Result<Vec<Conversation>>;
}
