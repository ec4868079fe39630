//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be used
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A typed command could not be turned into a message
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}
