//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: Inbox entities (`Conversation`, `Message`, `Participant`)
//! - `store`: The in-memory inbox (`ConversationStore`)
//! - `source`: Loader trait (`ConversationSource`)

mod model;
mod source;
mod store;

// Re-export public API
pub use model::{Conversation, DeliveryStatus, Message, Participant, SenderRole};
pub use source::ConversationSource;
pub use store::ConversationStore;
