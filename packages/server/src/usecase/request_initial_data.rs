//! UseCase: 初期データ要求処理

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, Notification, Snapshot, StateRepository,
};

use super::mutation_lock::MutationLock;

/// 初期データ要求のユースケース
pub struct RequestInitialDataUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl RequestInitialDataUseCase {
    /// 新しい RequestInitialDataUseCase を作成
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

    /// 要求した接続にのみ INITIAL_DATA を送る（ブロードキャストしない）
    ///
    /// スナップショットの取得と送信の間に他の更新が割り込まないよう、ロック下で行う。
    pub async fn execute(&self, connection_id: &ConnectionId) -> Result<(), MessagePushError> {
        let _guard = self.lock.acquire().await;

        let snapshot = self.repository.snapshot().await;
        self.message_pusher
            .push_to(connection_id, &Notification::InitialData(snapshot))
            .await
    }

    /// 現在のスナップショットを取得（HTTP のデバッグ用）
    pub async fn snapshot(&self) -> Snapshot {
        self.repository.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, Timestamp, UserName, message_pusher::MockMessagePusher},
        infrastructure::repository::InMemoryStateRepository,
    };

    #[tokio::test]
    async fn test_initial_data_is_pushed_only_to_requester() {
        // テスト項目: 初期データは要求した接続にのみ送られる
        // given (前提条件):
        let repository = Arc::new(InMemoryStateRepository::default());
        repository
            .start_typing(UserName::try_from("Dana").unwrap(), Timestamp::new(1))
            .await
            .unwrap();
        let requester = ConnectionIdFactory::generate();
        let expected_target = requester.clone();

        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        pusher
            .expect_push_to()
            .withf(move |target, n| {
                *target == expected_target
                    && matches!(n, Notification::InitialData(s) if s.typing_users.len() == 1)
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = RequestInitialDataUseCase::new(
            repository,
            Arc::new(pusher),
            Arc::new(MutationLock::new()),
        );

        // when (操作):
        let result = usecase.execute(&requester).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_initial_data_for_unknown_connection_fails() {
        // テスト項目: 未登録の接続への初期データ送信はエラーになる
        // given (前提条件):
        let repository = Arc::new(InMemoryStateRepository::default());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.to_string())));
        let usecase = RequestInitialDataUseCase::new(
            repository,
            Arc::new(pusher),
            Arc::new(MutationLock::new()),
        );

        // when (操作):
        let result = usecase.execute(&ConnectionIdFactory::generate()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
