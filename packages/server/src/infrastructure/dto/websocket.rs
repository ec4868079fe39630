//! WebSocket message DTOs.
//!
//! Every message in both directions is an envelope `{ "type": TAG, "payload": ... }`.
//! Field names inside payloads are camelCase.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Timestamp as sent by clients: an RFC 3339 string or Unix milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampDto {
    Millis(i64),
    Text(String),
}

// ========================================
// Client → Server
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSafetyPayload {
    pub id: String,
    pub name: String,
    pub timestamp: TimestampDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub timestamp: TimestampDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReactionPayload {
    pub message_id: String,
    pub emoji: String,
    pub reactor_name: String,
}

/// Inbound message, one variant per protocol tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    ReportSafety(ReportSafetyPayload),
    SendMessage(SendMessagePayload),
    RequestInitialData,
    ResetData,
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
    AddReaction(AddReactionPayload),
}

/// Why an inbound frame could not be turned into a `ClientMessage`
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("unknown message type '{0}'")]
    UnknownType(String),

    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct InboundEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

fn payload<T: DeserializeOwned>(
    kind: &'static str,
    value: serde_json::Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::InvalidPayload { kind, source })
}

impl ClientMessage {
    /// Decode a text frame.
    ///
    /// Tags without a payload ignore whatever `payload` carries.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope: InboundEnvelope = serde_json::from_str(text).map_err(DecodeError::Malformed)?;

        let message = match envelope.kind.as_str() {
            "REPORT_SAFETY" => Self::ReportSafety(payload("REPORT_SAFETY", envelope.payload)?),
            "SEND_MESSAGE" => Self::SendMessage(payload("SEND_MESSAGE", envelope.payload)?),
            "REQUEST_INITIAL_DATA" => Self::RequestInitialData,
            "RESET_DATA" => Self::ResetData,
            "TYPING_START" => Self::TypingStart(payload("TYPING_START", envelope.payload)?),
            "TYPING_STOP" => Self::TypingStop(payload("TYPING_STOP", envelope.payload)?),
            "ADD_REACTION" => Self::AddReaction(payload("ADD_REACTION", envelope.payload)?),
            other => return Err(DecodeError::UnknownType(other.to_string())),
        };
        Ok(message)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Wire tag of the message
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ReportSafety(_) => "REPORT_SAFETY",
            Self::SendMessage(_) => "SEND_MESSAGE",
            Self::RequestInitialData => "REQUEST_INITIAL_DATA",
            Self::ResetData => "RESET_DATA",
            Self::TypingStart(_) => "TYPING_START",
            Self::TypingStop(_) => "TYPING_STOP",
            Self::AddReaction(_) => "ADD_REACTION",
        }
    }
}

// ========================================
// Server → Client
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReportDto {
    pub id: String,
    pub name: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionGroupDto {
    pub emoji: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub timestamp: String,
    #[serde(default)]
    pub reactions: Vec<ReactionGroupDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    #[serde(default)]
    pub family_members: Vec<SafetyReportDto>,
    #[serde(default)]
    pub chat_messages: Vec<ChatMessageDto>,
    #[serde(default)]
    pub typing_users: Vec<String>,
}

/// Outbound message, one variant per protocol tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    InitialData(SnapshotDto),
    UpdateFamilyMembers(Vec<SafetyReportDto>),
    UpdateChatMessages(Vec<ChatMessageDto>),
    UpdateTypingUsers(Vec<String>),
}

impl ServerMessage {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
