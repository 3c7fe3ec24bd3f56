//! Error types for the admin console.

use serde::Serialize;
use thiserror::Error;

/// A shared error type for the console view models and their adapters.
///
/// Validation errors never reach the network. Request and not-found errors
/// come back from a record source and are surfaced to the operator as
/// notifications by the view models.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ConsoleError {
    /// Client-side validation failure (empty required field, bad sort column, ...)
    #[error("Validation error{}: {message}", .field.as_deref().map(|f| format!(" on '{f}'")).unwrap_or_default())]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// Network or server failure
    #[error("Request failed{}: {message}", .status.as_ref().map(|s| format!(" ({s})")).unwrap_or_default())]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConsoleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error attached to a field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a Validation error that is not tied to a single field
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a Request error
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came back from a record source.
    ///
    /// Not-found errors count as request failures from the operator's point
    /// of view; there is no special recovery for them.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Request { .. } | Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ConsoleError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ConsoleError>`.
pub type Result<T> = std::result::Result<T, ConsoleError>;
