//! UseCase error types.

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError};

/// Connection setup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("failed to send initial data: {0}")]
    InitialDataFailed(MessagePushError),
}

/// Outcome of a mutation that did not complete normally
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The request left the state unchanged; nothing was broadcast
    #[error("ignored: {0}")]
    Ignored(#[from] RepositoryError),

    /// The state changed but the update could not be broadcast
    #[error("broadcast failed: {0}")]
    BroadcastFailed(#[from] MessagePushError),
}
