//! UseCase: 絵文字リアクションのトグル処理

use std::sync::Arc;

use crate::domain::{
    MessagePusher, Notification, ReactionRequest, ReactionToggle, StateRepository,
};

use super::{error::MutationError, mutation_lock::MutationLock};

/// リアクションのユースケース
pub struct ToggleReactionUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl ToggleReactionUseCase {
    /// 新しい ToggleReactionUseCase を作成
    pub fn new(
        repository: Arc<dyn StateRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        lock: Arc<MutationLock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            lock,
        }
    }

    /// リアクションをトグルし、メッセージリスト全体をブロードキャストする
    ///
    /// # Returns
    ///
    /// * `Ok(ReactionToggle)` - 追加されたか削除されたか
    /// * `Err(MutationError::Ignored)` - 対象メッセージが存在しない（通知なし）
    pub async fn execute(&self, request: ReactionRequest) -> Result<ReactionToggle, MutationError> {
        let _guard = self.lock.acquire().await;

        let (toggle, messages) = self.repository.toggle_reaction(request).await?;
        self.message_pusher
            .broadcast(&Notification::ChatMessages(messages))
            .await?;

        Ok(toggle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChatMessage, Emoji, MessageBody, MessageId, RepositoryError, Timestamp, UserName,
            message_pusher::MockMessagePusher,
        },
        infrastructure::repository::InMemoryStateRepository,
    };

    fn request(message_id: &str, emoji: &str, reactor: &str) -> ReactionRequest {
        ReactionRequest {
            message_id: MessageId::try_from(message_id).unwrap(),
            emoji: Emoji::try_from(emoji).unwrap(),
            reactor: UserName::try_from(reactor).unwrap(),
        }
    }

    async fn repository_with_message() -> Arc<InMemoryStateRepository> {
        let repository = Arc::new(InMemoryStateRepository::default());
        repository
            .add_message(ChatMessage::new(
                MessageId::try_from("m1").unwrap(),
                UserName::try_from("Dana").unwrap(),
                MessageBody::try_from("hi").unwrap(),
                Timestamp::new(1704067200000),
            ))
            .await
            .unwrap();
        repository
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state_and_broadcasts_each_time() {
        // テスト項目: 同じリアクションを 2 回送ると元に戻り、毎回ブロードキャストされる
        // given (前提条件):
        let repository = repository_with_message().await;
        let before = repository.snapshot().await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|n| matches!(n, Notification::ChatMessages(_)))
            .times(2)
            .returning(|_| Ok(1));
        let usecase = ToggleReactionUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(MutationLock::new()),
        );

        // when (操作):
        let first = usecase.execute(request("m1", "👍", "Ben")).await;
        let second = usecase.execute(request("m1", "👍", "Ben")).await;

        // then (期待する結果):
        assert_eq!(first, Ok(ReactionToggle::Added));
        assert_eq!(second, Ok(ReactionToggle::Removed));
        assert_eq!(repository.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_reaction_on_unknown_message_is_noop() {
        // テスト項目: 存在しないメッセージへのリアクションは何もしない
        // given (前提条件):
        let repository = repository_with_message().await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = ToggleReactionUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(MutationLock::new()),
        );

        // when (操作):
        let result = usecase.execute(request("m404", "👍", "Ben")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MutationError::Ignored(RepositoryError::MessageNotFound(
                "m404".to_string()
            )))
        );
    }
}
