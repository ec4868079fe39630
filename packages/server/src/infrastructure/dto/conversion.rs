//! Conversion logic between DTOs and domain entities.
//!
//! Inbound payloads are validated here: a payload that fails conversion is
//! treated like one with missing fields.

use stockhammer_shared::time::{is_valid_millis, parse_rfc3339_millis, timestamp_to_rfc3339};

use crate::domain::{
    ChatMessage, Emoji, MemberId, MessageBody, MessageId, Notification, ReactionGroup,
    ReactionRequest, SafetyReport, Snapshot, Timestamp, UserName, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::TimestampDto> for Timestamp {
    type Error = ValueObjectError;

    fn try_from(value: dto::TimestampDto) -> Result<Self, Self::Error> {
        match value {
            dto::TimestampDto::Millis(millis) if is_valid_millis(millis) => {
                Ok(Timestamp::new(millis))
            }
            dto::TimestampDto::Millis(millis) => {
                Err(ValueObjectError::InvalidTimestamp(millis.to_string()))
            }
            dto::TimestampDto::Text(text) => parse_rfc3339_millis(&text)
                .map(Timestamp::new)
                .ok_or(ValueObjectError::InvalidTimestamp(text)),
        }
    }
}

impl TryFrom<dto::ReportSafetyPayload> for SafetyReport {
    type Error = ValueObjectError;

    fn try_from(payload: dto::ReportSafetyPayload) -> Result<Self, Self::Error> {
        Ok(SafetyReport::new(
            MemberId::new(payload.id)?,
            UserName::new(payload.name)?,
            payload.timestamp.try_into()?,
        ))
    }
}

impl TryFrom<dto::SendMessagePayload> for ChatMessage {
    type Error = ValueObjectError;

    fn try_from(payload: dto::SendMessagePayload) -> Result<Self, Self::Error> {
        Ok(ChatMessage::new(
            MessageId::new(payload.id)?,
            UserName::new(payload.sender)?,
            MessageBody::new(payload.message)?,
            payload.timestamp.try_into()?,
        ))
    }
}

impl TryFrom<dto::TypingPayload> for UserName {
    type Error = ValueObjectError;

    fn try_from(payload: dto::TypingPayload) -> Result<Self, Self::Error> {
        UserName::new(payload.user_name)
    }
}

impl TryFrom<dto::AddReactionPayload> for ReactionRequest {
    type Error = ValueObjectError;

    fn try_from(payload: dto::AddReactionPayload) -> Result<Self, Self::Error> {
        Ok(ReactionRequest {
            message_id: MessageId::new(payload.message_id)?,
            emoji: Emoji::new(payload.emoji)?,
            reactor: UserName::new(payload.reactor_name)?,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<SafetyReport> for dto::SafetyReportDto {
    fn from(model: SafetyReport) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name.into_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<ReactionGroup> for dto::ReactionGroupDto {
    fn from(model: ReactionGroup) -> Self {
        Self {
            emoji: model.emoji.into_string(),
            users: model.users.into_iter().map(UserName::into_string).collect(),
        }
    }
}

impl From<ChatMessage> for dto::ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.into_string(),
            sender: model.sender.into_string(),
            message: model.body.into_string(),
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
            reactions: model.reactions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Snapshot> for dto::SnapshotDto {
    fn from(model: Snapshot) -> Self {
        Self {
            family_members: model.family_members.into_iter().map(Into::into).collect(),
            chat_messages: model.chat_messages.into_iter().map(Into::into).collect(),
            typing_users: model
                .typing_users
                .into_iter()
                .map(UserName::into_string)
                .collect(),
        }
    }
}

impl From<Notification> for dto::ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::InitialData(snapshot) => Self::InitialData(snapshot.into()),
            Notification::FamilyMembers(reports) => {
                Self::UpdateFamilyMembers(reports.into_iter().map(Into::into).collect())
            }
            Notification::ChatMessages(messages) => {
                Self::UpdateChatMessages(messages.into_iter().map(Into::into).collect())
            }
            Notification::TypingUsers(users) => {
                Self::UpdateTypingUsers(users.into_iter().map(UserName::into_string).collect())
            }
        }
    }
}
