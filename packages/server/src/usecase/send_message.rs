//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージの追加、メッセージリストのブロードキャスト、送信者の入力中状態の解除
//!
//! ### なぜこのテストが必要か
//! - 送信したユーザーの「入力中」表示が残らないことを保証
//! - 重複 ID のメッセージが二重に表示されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：入力中でない送信者のメッセージ（通知 1 回）
//! - 正常系：入力中の送信者のメッセージ（通知 2 回、順序あり）
//! - 異常系：重複 ID（通知なし）

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, MessagePusher, Notification, StateRepository};

use super::{error::MutationError, mutation_lock::MutationLock};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
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

    /// メッセージ送信を実行
    ///
    /// 送信者名を接続に紐づけ、メッセージを追加して UPDATE_CHAT_MESSAGES を
    /// ブロードキャストする。送信者が入力中だった場合は解除し、続けて
    /// UPDATE_TYPING_USERS もブロードキャストする。
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ChatMessage>)` - 更新後のメッセージリスト
    /// * `Err(MutationError::Ignored)` - 同じ ID のメッセージが既に存在（通知なし）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        message: ChatMessage,
    ) -> Result<Vec<ChatMessage>, MutationError> {
        let _guard = self.lock.acquire().await;

        let sender = message.sender.clone();
        self.repository
            .bind_identity(connection_id.clone(), sender.clone())
            .await;

        let messages = self.repository.add_message(message).await?;
        self.message_pusher
            .broadcast(&Notification::ChatMessages(messages.clone()))
            .await?;

        if let Ok(typing_users) = self.repository.stop_typing(&sender).await {
            self.message_pusher
                .broadcast(&Notification::TypingUsers(typing_users))
                .await?;
        }

        Ok(messages)
    }
}
