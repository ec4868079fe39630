//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Required text was empty or whitespace only
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Text exceeded the maximum number of characters
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Timestamp could not be interpreted as a date
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Reasons a state mutation was not applied.
///
/// None of these are faults: each describes a request that leaves the state
/// unchanged and therefore triggers no broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("member '{0}' has already reported")]
    DuplicateReport(String),

    #[error("message '{0}' already exists")]
    DuplicateMessage(String),

    #[error("message '{0}' not found")]
    MessageNotFound(String),

    #[error("'{0}' is already typing")]
    AlreadyTyping(String),

    #[error("'{0}' is not typing")]
    NotTyping(String),
}

/// Errors raised while pushing notifications to clients
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No open connection is registered under the id
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// The connection's outbound channel is closed
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// The notification could not be serialized
    #[error("failed to encode notification: {0}")]
    EncodeFailed(String),
}
