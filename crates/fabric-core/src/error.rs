//! Error types for the fabric reconciliation system
//!
//! This module defines all error types used throughout the crate.
//!
//! Two outcomes that look like failures are deliberately absent here:
//! "desired absent, not found" and "desired present, already found" are
//! successful no-ops and are reported through
//! [`ReconciliationOutcome`](crate::engine::ReconciliationOutcome).

use serde_json::Value;
use thiserror::Error;

/// Result type alias for fabric operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the fabric reconciliation system
#[derive(Error, Debug)]
pub enum Error {
    /// The remote service answered with a status outside the expected class
    #[error("Transport error: {operation} {path} returned status {status}: {body}")]
    Transport {
        /// HTTP-style verb of the failed call (GET, POST, DELETE)
        operation: &'static str,
        /// Collection or record path the call targeted
        path: String,
        /// Status returned by the remote service
        status: u16,
        /// Diagnostic payload returned by the remote service
        body: Value,
    },

    /// The remote response did not have the expected collection/record shape
    #[error("Schema error: {message}: {payload}")]
    Schema {
        /// What was expected
        message: String,
        /// The offending payload
        payload: Value,
    },

    /// A declared resource lacks a value for a required identity key
    #[error("Identity error: {kind} declaration is missing identity field '{field}'")]
    Identity {
        /// Resource kind wire name
        kind: String,
        /// Dotted path of the missing field
        field: String,
    },

    /// No response could be obtained from the remote service
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed declaration documents
    #[error("Declaration error: {0}")]
    Declaration(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error from an unexpected remote status
    pub fn transport(
        operation: &'static str,
        path: impl Into<String>,
        status: u16,
        body: Value,
    ) -> Self {
        Self::Transport {
            operation,
            path: path.into(),
            status,
            body,
        }
    }

    /// Create a schema error carrying the offending payload
    pub fn schema(message: impl Into<String>, payload: Value) -> Self {
        Self::Schema {
            message: message.into(),
            payload,
        }
    }

    /// Create an identity error
    pub fn identity(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Identity {
            kind: kind.into(),
            field: field.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a declaration error
    pub fn declaration(msg: impl Into<String>) -> Self {
        Self::Declaration(msg.into())
    }

    /// Remote status carried by a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_error_carries_status_and_body() {
        let err = Error::transport(
            "GET",
            "resources/ip-pools",
            500,
            json!({"errors": "boom"}),
        );

        assert_eq!(err.status(), Some(500));
        let msg = err.to_string();
        assert!(msg.contains("GET resources/ip-pools"));
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_identity_error_names_field() {
        let err = Error::identity("templates", "design_template.display_name");
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("design_template.display_name"));
        assert!(err.to_string().contains("templates"));
    }

    #[test]
    fn test_schema_error_includes_payload() {
        let err = Error::schema("collection is not an object", json!([1, 2]));
        assert!(err.to_string().contains("[1,2]"));
    }
}
