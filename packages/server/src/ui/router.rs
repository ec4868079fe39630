//! Message Router: decodes inbound frames and dispatches them to use cases.
//!
//! Nothing is ever sent back to the originating client as an error. Frames
//! that cannot be decoded or validated, and requests that would not change
//! the state, are logged and dropped; the connection stays open.

use std::fmt::Display;

use crate::{
    domain::{ChatMessage, ConnectionId, ReactionRequest, SafetyReport, UserName},
    infrastructure::dto::websocket::{ClientMessage, DecodeError},
    usecase::MutationError,
};

use super::state::AppState;

/// Handle one inbound text frame
pub async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    match ClientMessage::decode(text) {
        Ok(message) => dispatch(state, connection_id, message).await,
        Err(DecodeError::UnknownType(kind)) => {
            tracing::debug!(
                "Ignoring message of unknown type '{}' from '{}'",
                kind,
                connection_id
            );
        }
        Err(e) => {
            tracing::warn!("Ignoring undecodable message from '{}': {}", connection_id, e);
        }
    }
}

/// Dispatch a decoded message to its use case
pub async fn dispatch(state: &AppState, connection_id: &ConnectionId, message: ClientMessage) {
    let kind = message.kind();
    tracing::debug!("Dispatching {} from '{}'", kind, connection_id);

    match message {
        ClientMessage::ReportSafety(payload) => {
            let Some(report) = validate::<SafetyReport, _>(kind, connection_id, payload) else {
                return;
            };
            let result = state.report_safety_usecase.execute(report).await;
            log_outcome(kind, connection_id, result);
        }
        ClientMessage::SendMessage(payload) => {
            let Some(message) = validate::<ChatMessage, _>(kind, connection_id, payload) else {
                return;
            };
            let result = state
                .send_message_usecase
                .execute(connection_id, message)
                .await;
            log_outcome(kind, connection_id, result);
        }
        ClientMessage::RequestInitialData => {
            if let Err(e) = state
                .request_initial_data_usecase
                .execute(connection_id)
                .await
            {
                tracing::warn!("Failed to send initial data to '{}': {}", connection_id, e);
            }
        }
        ClientMessage::ResetData => {
            tracing::info!("Connection '{}' requested a data reset", connection_id);
            let result = state.reset_data_usecase.execute().await;
            log_outcome(kind, connection_id, result);
        }
        ClientMessage::TypingStart(payload) => {
            let Some(name) = validate::<UserName, _>(kind, connection_id, payload) else {
                return;
            };
            let result = state.typing_usecase.start(connection_id, name).await;
            log_outcome(kind, connection_id, result);
        }
        ClientMessage::TypingStop(payload) => {
            let Some(name) = validate::<UserName, _>(kind, connection_id, payload) else {
                return;
            };
            let result = state.typing_usecase.stop(&name).await;
            log_outcome(kind, connection_id, result);
        }
        ClientMessage::AddReaction(payload) => {
            let Some(request) = validate::<ReactionRequest, _>(kind, connection_id, payload) else {
                return;
            };
            let result = state.toggle_reaction_usecase.execute(request).await;
            log_outcome(kind, connection_id, result);
        }
    }
}

fn validate<T, P>(kind: &str, connection_id: &ConnectionId, payload: P) -> Option<T>
where
    T: TryFrom<P>,
    T::Error: Display,
{
    match T::try_from(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring invalid {} from '{}': {}", kind, connection_id, e);
            None
        }
    }
}

fn log_outcome<T>(kind: &str, connection_id: &ConnectionId, result: Result<T, MutationError>) {
    match result {
        Ok(_) => {}
        Err(MutationError::Ignored(reason)) => {
            tracing::debug!("{} from '{}' ignored: {}", kind, connection_id, reason);
        }
        Err(e @ MutationError::BroadcastFailed(_)) => {
            tracing::warn!("{} from '{}': {}", kind, connection_id, e);
        }
    }
}
