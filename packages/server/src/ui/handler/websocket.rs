//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, ConnectionIdFactory},
    ui::{router::handle_text, state::AppState},
};

/// Plaintext body served to requests that are not WebSocket upgrades
const PLAINTEXT_HEALTH: &str = "WebSocket server is running";

/// Upgrade any path to a relay connection; answer plain HTTP with a liveness line.
pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_upgrade(move |socket| handle_socket(socket, state))
            .into_response(),
        Err(_) => PLAINTEXT_HEALTH.into_response(),
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every frame addressed to this connection (initial data and broadcasts)
/// goes through this single writer, so frames are sent in enqueue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (sender, receiver) = socket.split();

    // Channel for frames addressed to this connection
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);

    if let Err(e) = state
        .connect_client_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        tracing::error!("Failed to set up connection '{}': {}", connection_id, e);
        send_task.abort();
        return;
    }
    tracing::info!("Client '{}' connected", connection_id);

    read_frames(receiver, &mut send_task, &state, &connection_id).await;
    send_task.abort();

    disconnect(&state, &connection_id).await;
}

/// Read and dispatch frames from this client until it closes or the writer ends.
///
/// Writer exit is only observed between frames: a frame already being
/// dispatched always runs to completion, so a mutation is never left
/// without its broadcast.
async fn read_frames<S>(
    mut receiver: S,
    send_task: &mut JoinHandle<()>,
    state: &AppState,
    connection_id: &ConnectionId,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let msg = tokio::select! {
            msg = receiver.next() => msg,
            _ = &mut *send_task => {
                tracing::debug!("Writer for '{}' ended; no longer reading", connection_id);
                break;
            }
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
            None => break,
        };

        match msg {
            Message::Text(text) => {
                let text = text.as_str();
                tracing::trace!("Received text from '{}': {}", connection_id, text);
                handle_text(state, connection_id, text).await;
            }
            Message::Binary(data) => match std::str::from_utf8(&data) {
                Ok(text) => handle_text(state, connection_id, text).await,
                Err(_) => {
                    tracing::warn!("Ignoring non UTF-8 binary frame from '{}'", connection_id);
                }
            },
            Message::Ping(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                tracing::debug!("Received ping");
            }
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", connection_id);
                break;
            }
            Message::Pong(_) => {}
        }
    }
}

async fn disconnect(state: &AppState, connection_id: &ConnectionId) {
    match state.disconnect_client_usecase.execute(connection_id).await {
        Ok(Some(typing_users)) => {
            tracing::info!(
                "Client '{}' disconnected; typing users now {}",
                connection_id,
                typing_users.len()
            );
        }
        Ok(None) => tracing::info!("Client '{}' disconnected", connection_id),
        Err(e) => {
            tracing::warn!(
                "Client '{}' disconnected but typing update failed: {}",
                connection_id,
                e
            );
        }
    }
}
