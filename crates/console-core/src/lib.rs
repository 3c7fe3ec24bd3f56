pub mod config;
pub mod conversation;
pub mod error;
pub mod list;
pub mod record;

// Re-export common error type
pub use error::{ConsoleError, Result};
