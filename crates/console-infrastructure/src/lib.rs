pub mod config_service;
pub mod demo;
pub mod dto;
pub mod http;
pub mod json_conversation_source;
pub mod memory_record_source;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::demo::DemoLookupSource;
pub use crate::http::{ApiClient, HttpLookupSource, HttpRecordSource};
pub use crate::json_conversation_source::JsonConversationSource;
pub use crate::memory_record_source::InMemoryRecordSource;
pub use crate::paths::ConsolePaths;
