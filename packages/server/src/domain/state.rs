//! The shared state aggregate.
//!
//! `FamilyState` owns every safety report, chat message and typing entry,
//! plus the side table binding each connection to the user name it last
//! declared. All mutation rules live here; the repository only guards it.

use std::collections::HashMap;

use super::{
    entity::{ChatMessage, ReactionRequest, ReactionToggle, SafetyReport, TypingUser},
    error::RepositoryError,
    value_object::{ConnectionId, Timestamp, UserName},
};

/// Full copy of the shared state as sent to clients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub family_members: Vec<SafetyReport>,
    pub chat_messages: Vec<ChatMessage>,
    pub typing_users: Vec<UserName>,
}

/// Shared state store
#[derive(Debug, Clone, Default)]
pub struct FamilyState {
    reports: Vec<SafetyReport>,
    messages: Vec<ChatMessage>,
    typing: Vec<TypingUser>,
    identities: HashMap<ConnectionId, UserName>,
}

impl FamilyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[SafetyReport] {
        &self.reports
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Names of users currently typing, in the order they started
    pub fn typing_users(&self) -> Vec<UserName> {
        self.typing.iter().map(|t| t.name.clone()).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            family_members: self.reports.clone(),
            chat_messages: self.messages.clone(),
            typing_users: self.typing_users(),
        }
    }

    /// Append a report unless one with the same id exists.
    pub fn report_safety(&mut self, report: SafetyReport) -> Result<(), RepositoryError> {
        if self.reports.iter().any(|r| r.id == report.id) {
            return Err(RepositoryError::DuplicateReport(report.id.into_string()));
        }
        self.reports.push(report);
        Ok(())
    }

    /// Append a message unless one with the same id exists.
    pub fn add_message(&mut self, message: ChatMessage) -> Result<(), RepositoryError> {
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::DuplicateMessage(message.id.into_string()));
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn toggle_reaction(
        &mut self,
        request: ReactionRequest,
    ) -> Result<ReactionToggle, RepositoryError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == request.message_id)
            .ok_or_else(|| RepositoryError::MessageNotFound(request.message_id.into_string()))?;
        Ok(message.toggle_reaction(request.emoji, request.reactor))
    }

    /// Add a typing entry. A repeated start only refreshes `since`, which
    /// keeps the entry from expiring but is not a visible change.
    pub fn start_typing(&mut self, name: UserName, now: Timestamp) -> Result<(), RepositoryError> {
        if let Some(entry) = self.typing.iter_mut().find(|t| t.name == name) {
            entry.since = now;
            return Err(RepositoryError::AlreadyTyping(name.into_string()));
        }
        self.typing.push(TypingUser { name, since: now });
        Ok(())
    }

    pub fn stop_typing(&mut self, name: &UserName) -> Result<(), RepositoryError> {
        let index = self
            .typing
            .iter()
            .position(|t| t.name == *name)
            .ok_or_else(|| RepositoryError::NotTyping(name.as_str().to_string()))?;
        self.typing.remove(index);
        Ok(())
    }

    /// Remove typing entries announced before `cutoff`, returning their names.
    pub fn expire_typing(&mut self, cutoff: Timestamp) -> Vec<UserName> {
        let mut expired = Vec::new();
        self.typing.retain(|t| {
            if t.since < cutoff {
                expired.push(t.name.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Clear safety reports and typing state. Chat history is kept.
    pub fn reset(&mut self) {
        self.reports.clear();
        self.typing.clear();
    }

    /// Record the user name a connection declared, replacing any earlier one.
    pub fn bind_identity(&mut self, connection_id: ConnectionId, name: UserName) {
        self.identities.insert(connection_id, name);
    }

    pub fn identity_of(&self, connection_id: &ConnectionId) -> Option<&UserName> {
        self.identities.get(connection_id)
    }

    pub fn release_identity(&mut self, connection_id: &ConnectionId) -> Option<UserName> {
        self.identities.remove(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ConnectionIdFactory, Emoji, MemberId, MessageBody, MessageId, ReactionGroup,
    };

    fn report(id: &str, name: &str) -> SafetyReport {
        SafetyReport::new(
            MemberId::try_from(id).unwrap(),
            UserName::try_from(name).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn message(id: &str, sender: &str) -> ChatMessage {
        ChatMessage::new(
            MessageId::try_from(id).unwrap(),
            UserName::try_from(sender).unwrap(),
            MessageBody::try_from("hi").unwrap(),
            Timestamp::new(2000),
        )
    }

    fn user(name: &str) -> UserName {
        UserName::try_from(name).unwrap()
    }

    #[test]
    fn test_report_safety_is_idempotent_per_id() {
        // テスト項目: 同じ ID の安否報告を繰り返しても 1 件のみ保持される
        // given (前提条件):
        let mut state = FamilyState::new();

        // when (操作):
        let first = state.report_safety(report("1", "Dana"));
        let second = state.report_safety(report("1", "Dana"));
        let third = state.report_safety(report("1", "Someone else"));

        // then (期待する結果):
        assert!(first.is_ok());
        assert_eq!(second, Err(RepositoryError::DuplicateReport("1".to_string())));
        assert!(third.is_err());
        assert_eq!(state.reports().len(), 1);
        assert_eq!(state.reports()[0].name.as_str(), "Dana");
    }

    #[test]
    fn test_reports_keep_arrival_order() {
        // テスト項目: 安否報告は到着順に保持される
        // given (前提条件):
        let mut state = FamilyState::new();

        // when (操作):
        state.report_safety(report("2", "Ben")).unwrap();
        state.report_safety(report("1", "Dana")).unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = state.reports().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_add_message_rejects_duplicate_id() {
        // テスト項目: 同じ ID のメッセージは追加されない
        // given (前提条件):
        let mut state = FamilyState::new();
        state.add_message(message("m1", "Dana")).unwrap();

        // when (操作):
        let result = state.add_message(message("m1", "Ben"));

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::DuplicateMessage("m1".to_string())));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].sender.as_str(), "Dana");
    }

    #[test]
    fn test_toggle_reaction_on_unknown_message() {
        // テスト項目: 存在しないメッセージへのリアクションはエラーになり状態は変わらない
        // given (前提条件):
        let mut state = FamilyState::new();
        state.add_message(message("m1", "Dana")).unwrap();

        // when (操作):
        let result = state.toggle_reaction(ReactionRequest {
            message_id: MessageId::try_from("missing").unwrap(),
            emoji: Emoji::try_from("👍").unwrap(),
            reactor: user("Ben"),
        });

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::MessageNotFound("missing".to_string()))
        );
        assert!(state.messages()[0].reactions.is_empty());
    }

    #[test]
    fn test_toggle_reaction_on_existing_message() {
        // テスト項目: 既存メッセージにリアクションが追加される
        // given (前提条件):
        let mut state = FamilyState::new();
        state.add_message(message("m1", "Dana")).unwrap();

        // when (操作):
        let result = state.toggle_reaction(ReactionRequest {
            message_id: MessageId::try_from("m1").unwrap(),
            emoji: Emoji::try_from("👍").unwrap(),
            reactor: user("Ben"),
        });

        // then (期待する結果):
        assert_eq!(result, Ok(ReactionToggle::Added));
        assert_eq!(
            state.messages()[0].reactions,
            vec![ReactionGroup {
                emoji: Emoji::try_from("👍").unwrap(),
                users: vec![user("Ben")],
            }]
        );
    }

    #[test]
    fn test_typing_start_and_stop() {
        // テスト項目: 入力中状態の開始・終了が正しく反映される
        // given (前提条件):
        let mut state = FamilyState::new();

        // when (操作):
        state.start_typing(user("Dana"), Timestamp::new(1)).unwrap();
        state.start_typing(user("Ben"), Timestamp::new(2)).unwrap();
        let again = state.start_typing(user("Dana"), Timestamp::new(3));
        state.stop_typing(&user("Dana")).unwrap();
        let not_typing = state.stop_typing(&user("Dana"));

        // then (期待する結果):
        assert_eq!(again, Err(RepositoryError::AlreadyTyping("Dana".to_string())));
        assert_eq!(not_typing, Err(RepositoryError::NotTyping("Dana".to_string())));
        assert_eq!(state.typing_users(), vec![user("Ben")]);
    }

    #[test]
    fn test_expire_typing_removes_only_stale_entries() {
        // テスト項目: 期限切れの入力中エントリのみ削除される
        // given (前提条件):
        let mut state = FamilyState::new();
        state.start_typing(user("Dana"), Timestamp::new(1000)).unwrap();
        state.start_typing(user("Ben"), Timestamp::new(5000)).unwrap();

        // when (操作):
        let expired = state.expire_typing(Timestamp::new(3000));

        // then (期待する結果):
        assert_eq!(expired, vec![user("Dana")]);
        assert_eq!(state.typing_users(), vec![user("Ben")]);
    }

    #[test]
    fn test_repeated_typing_start_refreshes_expiry() {
        // テスト項目: 入力開始を繰り返すと期限が延長される
        // given (前提条件):
        let mut state = FamilyState::new();
        state.start_typing(user("Dana"), Timestamp::new(1000)).unwrap();

        // when (操作):
        let again = state.start_typing(user("Dana"), Timestamp::new(4000));
        let expired = state.expire_typing(Timestamp::new(3000));

        // then (期待する結果):
        assert!(again.is_err());
        assert!(expired.is_empty());
        assert_eq!(state.typing_users(), vec![user("Dana")]);
    }

    #[test]
    fn test_reset_keeps_chat_history() {
        // テスト項目: リセットで安否報告と入力中状態は消えるがチャット履歴は残る
        // given (前提条件):
        let mut state = FamilyState::new();
        state.report_safety(report("1", "Dana")).unwrap();
        state.add_message(message("m1", "Dana")).unwrap();
        state.start_typing(user("Ben"), Timestamp::new(1)).unwrap();

        // when (操作):
        state.reset();

        // then (期待する結果):
        let snapshot = state.snapshot();
        assert!(snapshot.family_members.is_empty());
        assert!(snapshot.typing_users.is_empty());
        assert_eq!(snapshot.chat_messages.len(), 1);
    }

    #[test]
    fn test_identity_binding_last_declared_wins() {
        // テスト項目: 接続に紐づくユーザー名は最後に宣言されたものになる
        // given (前提条件):
        let mut state = FamilyState::new();
        let connection = ConnectionIdFactory::generate();

        // when (操作):
        state.bind_identity(connection.clone(), user("Dana"));
        state.bind_identity(connection.clone(), user("Dana B."));

        // then (期待する結果):
        assert_eq!(state.identity_of(&connection), Some(&user("Dana B.")));
        assert_eq!(state.release_identity(&connection), Some(user("Dana B.")));
        assert_eq!(state.release_identity(&connection), None);
    }
}
