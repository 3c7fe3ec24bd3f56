use super::model::{Conversation, DeliveryStatus, Message, SenderRole};
use crate::error::{ConsoleError, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The operator's in-memory inbox.
///
/// `ConversationStore` is responsible for:
/// - Keeping conversations ordered by most recent message first
/// - Tracking which conversation is open and clearing its unread counter
/// - Appending locally composed messages (optimistically marked as sent)
///
/// Nothing here talks to a server; all operations are synchronous.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
}

impl ConversationStore {
    /// Takes ownership of loaded conversations and orders them by recency.
    pub fn new(conversations: Vec<Conversation>) -> Self {
        let mut store = Self {
            conversations,
            active_id: None,
        };
        for conversation in &mut store.conversations {
            conversation.refresh_last_message();
        }
        store.sort_by_recency();
        store
    }

    /// Conversations, most recent first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    /// Opens a conversation. Its unread counter is cleared locally; there
    /// is no read receipt sent anywhere.
    pub fn select_conversation(&mut self, id: &str) -> Result<()> {
        let conversation = self.find_mut(id)?;
        if conversation.unread_count > 0 {
            tracing::debug!(
                "[ConversationStore] marking {} messages read in {}",
                conversation.unread_count,
                id
            );
            conversation.unread_count = 0;
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    /// Closes the open conversation, if any.
    pub fn clear_selection(&mut self) {
        self.active_id = None;
    }

    /// Appends an operator message stamped with the current time, or with
    /// the conversation's last message time if the local clock is behind it.
    pub fn append_message(&mut self, conversation_id: &str, body: &str) -> Result<Message> {
        let latest = self
            .find_mut(conversation_id)?
            .last_message_time
            .unwrap_or_default();
        self.append_message_at(conversation_id, body, Utc::now().max(latest))
    }

    /// Appends an operator message with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// - `ConsoleError::Validation` if `body` is empty or whitespace-only,
    ///   or `at` is earlier than the conversation's last message (the
    ///   conversation is left unchanged)
    /// - `ConsoleError::NotFound` if the conversation does not exist
    pub fn append_message_at(
        &mut self,
        conversation_id: &str,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<Message> {
        if body.trim().is_empty() {
            return Err(ConsoleError::validation("body", "message must not be empty"));
        }
        let message = self.push_message(
            conversation_id,
            SenderRole::Operator,
            body,
            at,
            DeliveryStatus::Sent,
        )?;
        tracing::debug!(
            "[ConversationStore] appended {} to {}",
            message.id,
            conversation_id
        );
        Ok(message)
    }

    /// Records an incoming customer message. Unless the conversation is
    /// open, its unread counter goes up by one. Like `append_message_at`, a
    /// timestamp earlier than the last message is rejected.
    pub fn receive_message_at(
        &mut self,
        conversation_id: &str,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<Message> {
        let is_active = self.active_id.as_deref() == Some(conversation_id);
        let message = self.push_message(
            conversation_id,
            SenderRole::Counterpart,
            body,
            at,
            DeliveryStatus::Delivered,
        )?;
        if !is_active {
            let conversation = self.find_mut(conversation_id)?;
            conversation.unread_count = conversation.unread_count.saturating_add(1);
        }
        Ok(message)
    }

    /// Records a delivery confirmation for an operator message.
    pub fn mark_delivery(
        &mut self,
        conversation_id: &str,
        message_id: &str,
        status: DeliveryStatus,
    ) -> Result<()> {
        let conversation = self.find_mut(conversation_id)?;
        let message = conversation
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ConsoleError::not_found("message", message_id))?;
        message.status = status;
        Ok(())
    }

    /// Case-insensitive substring match over display names.
    ///
    /// The returned iterator is lazy and can be cloned to restart the
    /// match; the store is not modified.
    pub fn filter_by_name<'a>(
        &'a self,
        term: &str,
    ) -> impl Iterator<Item = &'a Conversation> + Clone + use<'a> {
        let needle = term.trim().to_lowercase();
        self.conversations
            .iter()
            .filter(move |c| c.display_name().to_lowercase().contains(&needle))
    }

    fn push_message(
        &mut self,
        conversation_id: &str,
        sender: SenderRole,
        body: &str,
        at: DateTime<Utc>,
        status: DeliveryStatus,
    ) -> Result<Message> {
        let conversation = self.find_mut(conversation_id)?;
        // Message history stays in chronological order
        if conversation.last_message_time.is_some_and(|last| at < last) {
            return Err(ConsoleError::validation(
                "timestamp",
                "is earlier than the conversation's last message",
            ));
        }
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender,
            body: body.to_string(),
            timestamp: at,
            status,
        };
        conversation.push(message.clone());
        self.sort_by_recency();
        Ok(message)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ConsoleError::not_found("conversation", id))
    }

    /// Stable sort, newest first; conversations without messages go last.
    fn sort_by_recency(&mut self) {
        self.conversations
            .sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
    }
}
