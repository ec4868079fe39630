//! UseCase: データリセット処理
//!
//! 安否報告と入力中状態をクリアします。チャット履歴は保持されます。

use std::sync::Arc;

use crate::domain::{MessagePusher, Notification, Snapshot, StateRepository};

use super::{error::MutationError, mutation_lock::MutationLock};

/// データリセットのユースケース
pub struct ResetDataUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl ResetDataUseCase {
    /// 新しい ResetDataUseCase を作成
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

    /// リセットを実行し、リセット後のスナップショットを INITIAL_DATA として全接続に送る
    pub async fn execute(&self) -> Result<Snapshot, MutationError> {
        let _guard = self.lock.acquire().await;

        let snapshot = self.repository.reset().await;
        self.message_pusher
            .broadcast(&Notification::InitialData(snapshot.clone()))
            .await?;

        Ok(snapshot)
    }
}
