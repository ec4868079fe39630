//! UseCase: 入力中（タイピング）状態の処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TypingUseCase::start() / stop() / expire_stale()
//!
//! ### なぜこのテストが必要か
//! - 状態が変わった時だけブロードキャストされることを保証
//! - 停止を送らずに離れたユーザーが「入力中」のまま残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：開始・停止
//! - エッジケース：二重の開始、入力中でないユーザーの停止（通知なし）
//! - 期限切れ：タイムアウトを過ぎたエントリのみ削除

use std::{sync::Arc, time::Duration};

use stockhammer_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, Notification, StateRepository, Timestamp,
    UserName,
};

use super::{error::MutationError, mutation_lock::MutationLock};

/// 入力中状態のユースケース
pub struct TypingUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
    clock: Arc<dyn Clock>,
}

impl TypingUseCase {
    /// 新しい TypingUseCase を作成
    pub fn new(
        repository: Arc<dyn StateRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        lock: Arc<MutationLock>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            lock,
            clock,
        }
    }

    /// 入力開始
    ///
    /// ユーザー名を接続に紐づけ、入力中でなければ現在時刻で登録して通知する。
    pub async fn start(
        &self,
        connection_id: &ConnectionId,
        name: UserName,
    ) -> Result<Vec<UserName>, MutationError> {
        let _guard = self.lock.acquire().await;

        self.repository
            .bind_identity(connection_id.clone(), name.clone())
            .await;

        let now = Timestamp::new(self.clock.now_millis());
        let typing_users = self.repository.start_typing(name, now).await?;
        self.message_pusher
            .broadcast(&Notification::TypingUsers(typing_users.clone()))
            .await?;

        Ok(typing_users)
    }

    /// 入力終了
    pub async fn stop(&self, name: &UserName) -> Result<Vec<UserName>, MutationError> {
        let _guard = self.lock.acquire().await;

        let typing_users = self.repository.stop_typing(name).await?;
        self.message_pusher
            .broadcast(&Notification::TypingUsers(typing_users.clone()))
            .await?;

        Ok(typing_users)
    }

    /// `timeout` より長く更新のない入力中エントリを削除する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(users))` - 削除があり、残りの一覧を通知した
    /// * `Ok(None)` - 削除なし（通知なし）
    pub async fn expire_stale(
        &self,
        timeout: Duration,
    ) -> Result<Option<Vec<UserName>>, MessagePushError> {
        let _guard = self.lock.acquire().await;

        let timeout_millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Timestamp::new(self.clock.now_millis().saturating_sub(timeout_millis));

        let Some(typing_users) = self.repository.expire_typing(cutoff).await else {
            return Ok(None);
        };
        self.message_pusher
            .broadcast(&Notification::TypingUsers(typing_users.clone()))
            .await?;

        Ok(Some(typing_users))
    }
}
