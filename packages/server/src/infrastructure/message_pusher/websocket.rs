//! WebSocket を使った MessagePusher 実装（Connection Registry）
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 通知を JSON にエンコードし、クライアントへ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、送信にのみ使用します。
//! 各接続の送信タスクがチャネルを順に書き出すため、1 接続内の順序は保たれます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        ServerMessage::from(notification.clone())
            .encode()
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed {} to '{}'", notification.tag(), connection_id);
        Ok(())
    }

    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError> {
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for (connection_id, sender) in clients.iter() {
            // 閉じている接続はスキップ（登録解除は切断処理で行う）
            if let Err(e) = sender.send(content.clone()) {
                tracing::warn!("Failed to push message to '{}': {}", connection_id, e);
            } else {
                delivered += 1;
            }
        }
        tracing::debug!(
            "Broadcasted {} to {}/{} connections",
            notification.tag(),
            delivered,
            clients.len()
        );

        Ok(delivered)
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, UserName};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の登録・解除・送信
    // - push_to: 特定の接続への送信
    // - broadcast: 全接続への送信と、閉じた接続のスキップ
    //
    // 【なぜこのテストが必要か】
    // - ブロードキャストはリレーの中核であり、取りこぼしや重複があってはならない
    // ========================================

    fn typing(names: &[&str]) -> Notification {
        Notification::TypingUsers(
            names
                .iter()
                .map(|n| UserName::try_from(*n).unwrap())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON エンコードされた通知を送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionIdFactory::generate();
        pusher.register_client(connection.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, &typing(&["Dana"])).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"UPDATE_TYPING_USERS","payload":["Dana"]}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let connection = ConnectionIdFactory::generate();

        // when (操作):
        let result = pusher.push_to(&connection, &typing(&[])).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection_once() {
        // テスト項目: ブロードキャストが全接続に 1 回ずつ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher
            .register_client(ConnectionIdFactory::generate(), tx1)
            .await;
        pusher
            .register_client(ConnectionIdFactory::generate(), tx2)
            .await;

        // when (操作):
        let result = pusher.broadcast(&typing(&["Dana"])).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_connections() {
        // テスト項目: 閉じた接続はスキップされ、登録は残る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        pusher
            .register_client(ConnectionIdFactory::generate(), tx1)
            .await;
        pusher
            .register_client(ConnectionIdFactory::generate(), tx2)
            .await;
        drop(rx2);

        // when (操作):
        let result = pusher.broadcast(&typing(&[])).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert!(rx1.recv().await.is_some());
        assert_eq!(pusher.count_clients().await, 2);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        // テスト項目: 登録解除は何度呼んでも問題ない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = ConnectionIdFactory::generate();
        pusher.register_client(connection.clone(), tx).await;

        // when (操作):
        pusher.unregister_client(&connection).await;
        pusher.unregister_client(&connection).await;

        // then (期待する結果):
        assert_eq!(pusher.count_clients().await, 0);
        assert_eq!(pusher.broadcast(&typing(&[])).await, Ok(0));
    }
}
