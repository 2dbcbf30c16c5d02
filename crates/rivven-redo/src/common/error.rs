//! Error types for redo output operations
//!
//! Every error in this crate is fatal for the message being assembled: the
//! in-progress message is discarded and nothing partial reaches the sink.
//! Nothing is retried here; callers decide whether to abort the process.

use rivven_redo_protocol::ProtocolError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for metrics and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Framing contract broken by the caller's event ordering
    InternalConsistency,
    /// Message could not be rendered by the backend
    Serialization,
    /// Byte sink rejected the output
    Sink,
    /// Configuration errors (invalid settings)
    Configuration,
}

/// Redo output errors
#[derive(Error, Debug)]
pub enum RedoError {
    /// Framing state violated (message exists when none expected, or missing)
    #[error("{operation} processing failed, {reason}, internal error")]
    InvalidState {
        operation: &'static str,
        reason: &'static str,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Wire protocol error
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from a byte sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RedoError {
    /// Message expected to be open but none is
    pub fn message_missing(operation: &'static str) -> Self {
        Self::InvalidState {
            operation,
            reason: "message missing",
        }
    }

    /// Message expected to be closed but one is open
    pub fn message_exists(operation: &'static str) -> Self {
        Self::InvalidState {
            operation,
            reason: "message already exists",
        }
    }

    /// Create a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is retriable.
    ///
    /// Always false: consistency violations are programming errors and a
    /// failed serialization would fail the same way again.
    pub fn is_retriable(&self) -> bool {
        false
    }

    /// Check if this error is a framing contract violation.
    pub fn is_internal_consistency(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Get the error category for metrics and alerting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidState { .. } => ErrorCategory::InternalConsistency,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Protocol(_) => ErrorCategory::Serialization,
            Self::Json(_) => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Sink,
            Self::Config(_) => ErrorCategory::Configuration,
        }
    }

    /// Get a metric-safe error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "invalid_state",
            Self::Serialization(_) => "serialization_error",
            Self::Protocol(_) => "protocol_error",
            Self::Json(_) => "json_error",
            Self::Io(_) => "io_error",
            Self::Config(_) => "config_error",
        }
    }
}

/// Result type for redo output operations
pub type Result<T> = std::result::Result<T, RedoError>;
