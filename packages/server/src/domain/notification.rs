//! Outbound notifications.
//!
//! Each variant carries the complete state slice it describes; clients
//! replace their local copy rather than applying a diff.

use super::{
    entity::{ChatMessage, SafetyReport},
    state::Snapshot,
    value_object::UserName,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Everything: sent on connect, on request, and after a reset
    InitialData(Snapshot),
    FamilyMembers(Vec<SafetyReport>),
    ChatMessages(Vec<ChatMessage>),
    TypingUsers(Vec<UserName>),
}

impl Notification {
    /// Wire tag of the notification, for logging
    pub fn tag(&self) -> &'static str {
        match self {
            Self::InitialData(_) => "INITIAL_DATA",
            Self::FamilyMembers(_) => "UPDATE_FAMILY_MEMBERS",
            Self::ChatMessages(_) => "UPDATE_CHAT_MESSAGES",
            Self::TypingUsers(_) => "UPDATE_TYPING_USERS",
        }
    }
}
