//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 接続の登録と、接続直後の INITIAL_DATA 送信
//!
//! ### なぜこのテストが必要か
//! - 新しいクライアントは要求を待たずに現在の状態を受け取る必要がある
//! - 初期データの送信に失敗した接続が登録されたまま残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録とスナップショット送信
//! - 異常系：送信チャネルが既に閉じている

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Notification, PusherChannel, StateRepository};

use super::{error::ConnectError, mutation_lock::MutationLock};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（共有状態ストアの抽象化）
    repository: Arc<dyn StateRepository>,
    /// MessagePusher（接続レジストリの抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
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

    /// 接続を登録し、現在のスナップショットをその接続にのみ送信する
    ///
    /// 登録とスナップショット取得はロック下で行うため、以降のブロードキャストは
    /// すべてスナップショットより新しい状態になる。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        let _guard = self.lock.acquire().await;

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let snapshot = self.repository.snapshot().await;
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &Notification::InitialData(snapshot))
            .await
        {
            self.message_pusher.unregister_client(&connection_id).await;
            return Err(ConnectError::InitialDataFailed(e));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionIdFactory, MemberId, SafetyReport, Timestamp, UserName},
        infrastructure::{
            dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
            repository::InMemoryStateRepository,
        },
    };
    use tokio::sync::mpsc;

    fn create_usecase() -> (
        ConnectClientUseCase,
        Arc<InMemoryStateRepository>,
        Arc<WebSocketMessagePusher>,
    ) {
        let repository = Arc::new(InMemoryStateRepository::default());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let usecase = ConnectClientUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(MutationLock::new()),
        );
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_connect_sends_initial_data() {
        // テスト項目: 接続直後に現在の状態が INITIAL_DATA として送られる
        // given (前提条件):
        let (usecase, repository, pusher) = create_usecase();
        repository
            .add_report(SafetyReport::new(
                MemberId::try_from("1").unwrap(),
                UserName::try_from("Dana").unwrap(),
                Timestamp::new(1704067200000),
            ))
            .await
            .unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(ConnectionIdFactory::generate(), tx).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(pusher.count_clients().await, 1);
        let text = rx.recv().await.unwrap();
        let ServerMessage::InitialData(snapshot) = ServerMessage::decode(&text).unwrap() else {
            panic!("expected INITIAL_DATA, got {}", text);
        };
        assert_eq!(snapshot.family_members.len(), 1);
        assert_eq!(snapshot.family_members[0].name, "Dana");
    }

    #[tokio::test]
    async fn test_connect_with_closed_channel_is_rolled_back() {
        // テスト項目: 送信チャネルが閉じていれば登録は取り消される
        // given (前提条件):
        let (usecase, _repository, pusher) = create_usecase();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        // when (操作):
        let result = usecase.execute(ConnectionIdFactory::generate(), tx).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectError::InitialDataFailed(_))));
        assert_eq!(pusher.count_clients().await, 0);
    }
}
