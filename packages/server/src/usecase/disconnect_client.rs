//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 接続の登録解除と、その接続に紐づくユーザーの入力中状態の解除
//!
//! ### なぜこのテストが必要か
//! - 切断したユーザーが「入力中」のまま残らないことを保証
//! - 他のユーザーの入力中状態は切断の影響を受けないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：入力中のユーザーが切断
//! - エッジケース：ユーザー名を宣言していない接続の切断（通知なし）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, Notification, StateRepository, UserName,
};

use super::mutation_lock::MutationLock;

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
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

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(users))` - 入力中状態が変わり、残りの接続に通知した一覧
    /// * `Ok(None)` - 入力中状態に変化なし（通知なし）
    /// * `Err(MessagePushError)` - 通知失敗
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<Vec<UserName>>, MessagePushError> {
        let _guard = self.lock.acquire().await;

        self.message_pusher.unregister_client(connection_id).await;

        let Some(name) = self.repository.release_identity(connection_id).await else {
            return Ok(None);
        };
        let Ok(typing_users) = self.repository.stop_typing(&name).await else {
            return Ok(None);
        };

        tracing::debug!("Cleared typing state of '{}' on disconnect", name);
        self.message_pusher
            .broadcast(&Notification::TypingUsers(typing_users.clone()))
            .await?;
        Ok(Some(typing_users))
    }
}
