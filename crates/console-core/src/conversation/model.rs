//! Conversation domain model.
//!
//! This module contains the chat inbox entities: conversations with a
//! customer and the messages exchanged in them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    /// The console operator.
    Operator,
    /// The customer on the other end.
    Counterpart,
}

/// Delivery state of a message.
///
/// Operator messages start as `Sent` (optimistic); later states are only
/// reached through an explicit delivery confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Delivered,
    Read,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender: SenderRole,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub status: DeliveryStatus,
}

/// The customer a conversation is held with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A conversation and its full message history.
///
/// `last_message` and `last_message_time` are denormalized from the last
/// message so the inbox can be sorted without walking every history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participant: Participant,
    /// Messages in chronological (insertion) order
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unread_count: u32,
}

impl Conversation {
    /// Creates an empty conversation with a participant.
    pub fn new(id: impl Into<String>, participant: Participant) -> Self {
        Self {
            id: id.into(),
            participant,
            messages: Vec::new(),
            last_message: None,
            last_message_time: None,
            unread_count: 0,
        }
    }

    /// Name shown in the inbox list.
    pub fn display_name(&self) -> &str {
        &self.participant.name
    }

    /// Appends a message and recomputes the denormalized fields.
    pub(crate) fn push(&mut self, message: Message) {
        self.last_message = Some(message.body.clone());
        self.last_message_time = Some(message.timestamp);
        self.messages.push(message);
    }

    /// Recomputes `last_message` / `last_message_time` from the history.
    ///
    /// Fixtures may carry messages without the denormalized fields; the
    /// store calls this when it takes ownership.
    pub(crate) fn refresh_last_message(&mut self) {
        if let Some(last) = self.messages.last() {
            self.last_message = Some(last.body.clone());
            self.last_message_time = Some(last.timestamp);
        }
    }
}
