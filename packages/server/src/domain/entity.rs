//! Entities owned by the shared state store.

use super::value_object::{Emoji, MemberId, MessageBody, MessageId, Timestamp, UserName};

/// A family member's "I am safe" report.
///
/// Created once per distinct id and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyReport {
    pub id: MemberId,
    pub name: UserName,
    pub timestamp: Timestamp,
}

impl SafetyReport {
    pub fn new(id: MemberId, name: UserName, timestamp: Timestamp) -> Self {
        Self {
            id,
            name,
            timestamp,
        }
    }
}

/// Users who reacted to one message with one emoji.
///
/// `users` keeps first-reaction order and never holds duplicates. A group
/// with no users is removed from its message immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionGroup {
    pub emoji: Emoji,
    pub users: Vec<UserName>,
}

/// Outcome of toggling a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionToggle {
    Added,
    Removed,
}

/// A request to toggle `reactor`'s `emoji` reaction on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionRequest {
    pub message_id: MessageId,
    pub emoji: Emoji,
    pub reactor: UserName,
}

/// A chat message. The body is immutable; only `reactions` changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: UserName,
    pub body: MessageBody,
    pub timestamp: Timestamp,
    pub reactions: Vec<ReactionGroup>,
}

impl ChatMessage {
    /// Create a message with no reactions
    pub fn new(id: MessageId, sender: UserName, body: MessageBody, timestamp: Timestamp) -> Self {
        Self {
            id,
            sender,
            body,
            timestamp,
            reactions: Vec::new(),
        }
    }

    /// Toggle `user`'s reaction with `emoji`.
    ///
    /// Removes the user from the emoji's group if present (dropping the group
    /// once empty), otherwise adds them, creating the group when needed.
    pub fn toggle_reaction(&mut self, emoji: Emoji, user: UserName) -> ReactionToggle {
        let Some(index) = self.reactions.iter().position(|g| g.emoji == emoji) else {
            self.reactions.push(ReactionGroup {
                emoji,
                users: vec![user],
            });
            return ReactionToggle::Added;
        };

        let group = &mut self.reactions[index];
        if let Some(user_index) = group.users.iter().position(|u| *u == user) {
            group.users.remove(user_index);
            if group.users.is_empty() {
                self.reactions.remove(index);
            }
            ReactionToggle::Removed
        } else {
            group.users.push(user);
            ReactionToggle::Added
        }
    }
}

/// A user currently typing, with the time they last announced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingUser {
    pub name: UserName,
    pub since: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ChatMessage {
        ChatMessage::new(
            MessageId::try_from("m1").unwrap(),
            UserName::try_from("Dana").unwrap(),
            MessageBody::try_from("hi").unwrap(),
            Timestamp::new(1000),
        )
    }

    fn emoji(value: &str) -> Emoji {
        Emoji::try_from(value).unwrap()
    }

    fn user(value: &str) -> UserName {
        UserName::try_from(value).unwrap()
    }

    #[test]
    fn test_new_message_has_no_reactions() {
        // テスト項目: 新規メッセージのリアクションは空
        // given (前提条件):

        // when (操作):
        let msg = message();

        // then (期待する結果):
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_toggle_reaction_creates_group() {
        // テスト項目: 未登録の絵文字でリアクションするとグループが作成される
        // given (前提条件):
        let mut msg = message();

        // when (操作):
        let result = msg.toggle_reaction(emoji("👍"), user("Ben"));

        // then (期待する結果):
        assert_eq!(result, ReactionToggle::Added);
        assert_eq!(
            msg.reactions,
            vec![ReactionGroup {
                emoji: emoji("👍"),
                users: vec![user("Ben")],
            }]
        );
    }

    #[test]
    fn test_toggle_reaction_twice_is_noop() {
        // テスト項目: 同じリアクションを 2 回トグルすると元の状態に戻る
        // given (前提条件):
        let mut msg = message();
        msg.toggle_reaction(emoji("❤️"), user("Ann"));
        let before = msg.clone();

        // when (操作):
        let first = msg.toggle_reaction(emoji("👍"), user("Ben"));
        let second = msg.toggle_reaction(emoji("👍"), user("Ben"));

        // then (期待する結果):
        assert_eq!(first, ReactionToggle::Added);
        assert_eq!(second, ReactionToggle::Removed);
        assert_eq!(msg, before);
    }

    #[test]
    fn test_toggle_reaction_keeps_group_with_remaining_users() {
        // テスト項目: 他のユーザーが残っている場合、グループは削除されない
        // given (前提条件):
        let mut msg = message();
        msg.toggle_reaction(emoji("👍"), user("Ben"));
        msg.toggle_reaction(emoji("👍"), user("Ann"));

        // when (操作):
        let result = msg.toggle_reaction(emoji("👍"), user("Ben"));

        // then (期待する結果):
        assert_eq!(result, ReactionToggle::Removed);
        assert_eq!(msg.reactions.len(), 1);
        assert_eq!(msg.reactions[0].users, vec![user("Ann")]);
    }

    #[test]
    fn test_same_user_may_react_with_multiple_emojis() {
        // テスト項目: 同じユーザーが異なる絵文字で複数リアクションできる
        // given (前提条件):
        let mut msg = message();

        // when (操作):
        msg.toggle_reaction(emoji("👍"), user("Ben"));
        msg.toggle_reaction(emoji("🙏"), user("Ben"));

        // then (期待する結果):
        assert_eq!(msg.reactions.len(), 2);
        assert_eq!(msg.reactions[0].emoji, emoji("👍"));
        assert_eq!(msg.reactions[1].emoji, emoji("🙏"));
    }

    #[test]
    fn test_no_empty_group_after_toggle_sequence() {
        // テスト項目: どのようなトグル操作の後でも空のグループは存在しない
        // given (前提条件):
        let mut msg = message();
        let operations = [
            ("👍", "Ben"),
            ("👍", "Ann"),
            ("🙏", "Ben"),
            ("👍", "Ben"),
            ("👍", "Ann"),
            ("🙏", "Ann"),
            ("🙏", "Ben"),
        ];

        // when (操作):
        for (e, u) in operations {
            msg.toggle_reaction(emoji(e), user(u));

            // then (期待する結果):
            assert!(msg.reactions.iter().all(|g| !g.users.is_empty()));
        }
        assert_eq!(msg.reactions.len(), 1);
        assert_eq!(msg.reactions[0].emoji, emoji("🙏"));
        assert_eq!(msg.reactions[0].users, vec![user("Ann")]);
    }
}
