//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{Sink, SinkExt, StreamExt};
use stockhammer_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use stockhammer_shared::time::get_utc_timestamp;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    domain::{Command, Mirror, MirrorUpdate, build_message, parse_command},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one connection until the user quits (`Ok`) or the connection drops (`Err`)
pub async fn run_client_session(
    url: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to relay server!");
    println!(
        "\nYou are '{}'. Type a message and press Enter to send.\n\
         Commands: /safe, /react <n> <emoji>, /typing, /stop, /reset, /status, /quit\n",
        name
    );

    let (mut write, mut read) = ws_stream.split();
    let mirror = Arc::new(Mutex::new(Mirror::default()));

    send(&mut write, &ClientMessage::RequestInitialData).await?;

    // Spawn a task to handle incoming messages
    let mirror_for_read = mirror.clone();
    let name_for_read = name.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match ServerMessage::decode(text.as_str()) {
                    Ok(server_message) => {
                        let mut mirror = mirror_for_read.lock().await;
                        let update = mirror.apply(server_message);
                        print!("{}", render_update(&mirror, &update, &name_for_read));
                        redisplay_prompt(&name_for_read);
                    }
                    Err(e) => tracing::warn!("Ignoring unexpected server frame: {}", e),
                },
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                Ok(_) => {}
            }
        }
    });

    let input_loop = async {
        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("{}", MessageFormatter::format_notice(&e.to_string()));
                    redisplay_prompt(name);
                    continue;
                }
            };

            let now = get_utc_timestamp();
            let outbound = {
                let mirror = mirror.lock().await;
                match command {
                    Command::Status => {
                        print!("{}", MessageFormatter::format_snapshot(&mirror, name));
                        redisplay_prompt(name);
                        continue;
                    }
                    Command::Quit => break,
                    _ => build_message(
                        &command,
                        name,
                        &mirror,
                        || uuid::Uuid::new_v4().to_string(),
                        now,
                    ),
                }
            };

            match outbound {
                Ok(Some(message)) => {
                    send(&mut write, &message).await?;
                    if matches!(message, ClientMessage::SendMessage(_)) {
                        print!("{}", MessageFormatter::format_sent_confirmation(now));
                    }
                }
                Ok(None) => {}
                Err(e) => print!("{}", MessageFormatter::format_notice(&e.to_string())),
            }
            redisplay_prompt(name);
        }

        write.send(Message::Close(None)).await.ok();
        Ok::<(), ClientError>(())
    };

    // If either side completes, stop the other
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        input_result = input_loop => {
            read_task.abort();
            input_result
        }
    }
}

async fn send<S>(write: &mut S, message: &ClientMessage) -> Result<(), ClientError>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let json = message
        .encode()
        .map_err(|e| ClientError::ConnectionError(format!("Failed to encode message: {}", e)))?;
    write
        .send(Message::text(json))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

fn render_update(mirror: &Mirror, update: &MirrorUpdate, me: &str) -> String {
    match update {
        MirrorUpdate::Replaced => MessageFormatter::format_snapshot(mirror, me),
        MirrorUpdate::FamilyMembers => format!(
            "\n{}",
            MessageFormatter::format_family_members(&mirror.family_members, me)
        ),
        MirrorUpdate::ChatMessages { added, reacted } => {
            let mut output = String::from("\n");
            for (index, message) in added.iter().chain(reacted.iter()) {
                output.push_str(&MessageFormatter::format_chat_line(*index, message));
            }
            output
        }
        MirrorUpdate::TypingUsers => {
            format!("\n{}", MessageFormatter::format_typing(&mirror.others_typing(me)))
        }
    }
}
