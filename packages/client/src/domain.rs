//! Domain logic for client-side operations.
//!
//! Pure functions and the local state mirror; no I/O happens here.

use stockhammer_server::infrastructure::dto::websocket::{
    AddReactionPayload, ChatMessageDto, ClientMessage, ReportSafetyPayload, SafetyReportDto,
    SendMessagePayload, ServerMessage, TimestampDto, TypingPayload,
};
use stockhammer_shared::time::timestamp_to_rfc3339;

use crate::error::ClientError;

/// One line typed by the user
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Plain text: send a chat message
    Say(String),
    /// `/safe`
    Safe,
    /// `/react <n> <emoji>` (n is 1-based, as printed)
    React { index: usize, emoji: String },
    /// `/typing`
    TypingStart,
    /// `/stop`
    TypingStop,
    /// `/reset`
    Reset,
    /// `/status`
    Status,
    /// `/quit`
    Quit,
}

/// Parse a trimmed, non-empty input line
pub fn parse_command(line: &str) -> Result<Command, ClientError> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Ok(Command::Say(line.to_string()));
    }

    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/safe" => Ok(Command::Safe),
        "/typing" => Ok(Command::TypingStart),
        "/stop" => Ok(Command::TypingStop),
        "/reset" => Ok(Command::Reset),
        "/status" => Ok(Command::Status),
        "/quit" | "/exit" => Ok(Command::Quit),
        "/react" => {
            let usage = || ClientError::InvalidCommand("usage: /react <n> <emoji>".to_string());
            let index = parts
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(usage)?;
            let emoji = parts.next().ok_or_else(usage)?.to_string();
            Ok(Command::React { index, emoji })
        }
        other => Err(ClientError::InvalidCommand(format!(
            "unknown command '{}'",
            other
        ))),
    }
}

/// Stable safety report id for a display name, so repeated `/safe` is idempotent
pub fn report_id_for(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("member-{}", slug)
}

/// Build the protocol message for a command.
///
/// Returns `Ok(None)` for commands handled locally (`/status`, `/quit`).
pub fn build_message(
    command: &Command,
    name: &str,
    mirror: &Mirror,
    message_id: impl FnOnce() -> String,
    now_millis: i64,
) -> Result<Option<ClientMessage>, ClientError> {
    let timestamp = || TimestampDto::Text(timestamp_to_rfc3339(now_millis));
    let typing = || TypingPayload {
        user_name: name.to_string(),
    };

    let message = match command {
        Command::Say(text) => ClientMessage::SendMessage(SendMessagePayload {
            id: message_id(),
            sender: name.to_string(),
            message: text.clone(),
            timestamp: timestamp(),
        }),
        Command::Safe => ClientMessage::ReportSafety(ReportSafetyPayload {
            id: report_id_for(name),
            name: name.to_string(),
            timestamp: timestamp(),
        }),
        Command::React { index, emoji } => {
            let target = mirror.message_at(*index).ok_or_else(|| {
                ClientError::InvalidCommand(format!("no message #{}", index))
            })?;
            ClientMessage::AddReaction(AddReactionPayload {
                message_id: target.id.clone(),
                emoji: emoji.clone(),
                reactor_name: name.to_string(),
            })
        }
        Command::TypingStart => ClientMessage::TypingStart(typing()),
        Command::TypingStop => ClientMessage::TypingStop(typing()),
        Command::Reset => ClientMessage::ResetData,
        Command::Status | Command::Quit => return Ok(None),
    };
    Ok(Some(message))
}

/// What changed in the mirror after applying a server message
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorUpdate {
    /// Whole state replaced (`INITIAL_DATA`)
    Replaced,
    FamilyMembers,
    ChatMessages {
        /// Messages not seen before, with their 1-based position
        added: Vec<(usize, ChatMessageDto)>,
        /// Known messages whose reactions changed, with their 1-based position
        reacted: Vec<(usize, ChatMessageDto)>,
    },
    TypingUsers,
}

/// Local copy of the shared state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mirror {
    pub family_members: Vec<SafetyReportDto>,
    pub chat_messages: Vec<ChatMessageDto>,
    pub typing_users: Vec<String>,
}

impl Mirror {
    pub fn apply(&mut self, message: ServerMessage) -> MirrorUpdate {
        match message {
            ServerMessage::InitialData(snapshot) => {
                self.family_members = snapshot.family_members;
                self.chat_messages = snapshot.chat_messages;
                self.typing_users = snapshot.typing_users;
                MirrorUpdate::Replaced
            }
            ServerMessage::UpdateFamilyMembers(members) => {
                self.family_members = members;
                MirrorUpdate::FamilyMembers
            }
            ServerMessage::UpdateChatMessages(messages) => {
                let mut added = Vec::new();
                let mut reacted = Vec::new();
                for (i, message) in messages.iter().enumerate() {
                    match self.chat_messages.iter().find(|m| m.id == message.id) {
                        None => added.push((i + 1, message.clone())),
                        Some(known) if known.reactions != message.reactions => {
                            reacted.push((i + 1, message.clone()))
                        }
                        Some(_) => {}
                    }
                }
                self.chat_messages = messages;
                MirrorUpdate::ChatMessages { added, reacted }
            }
            ServerMessage::UpdateTypingUsers(users) => {
                self.typing_users = users;
                MirrorUpdate::TypingUsers
            }
        }
    }

    /// Message at a 1-based position
    pub fn message_at(&self, index: usize) -> Option<&ChatMessageDto> {
        index.checked_sub(1).and_then(|i| self.chat_messages.get(i))
    }

    /// Typing users other than `me`
    pub fn others_typing(&self, me: &str) -> Vec<&str> {
        self.typing_users
            .iter()
            .map(String::as_str)
            .filter(|name| *name != me)
            .collect()
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
