//! MessagePusher trait 定義
//!
//! 接続中のクライアントへ通知を届けるためのインターフェース（Connection Registry）。
//! WebSocket の生成は UI 層、送信先の管理と送信は Infrastructure 層が担当します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// Outbound channel of one connection, drained by its writer task
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録する
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する（登録されていなければ何もしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定の接続にのみ通知を送る
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 登録中の全接続に通知を送り、届けられた接続数を返す
    ///
    /// 閉じている接続は黙ってスキップする（登録解除は切断イベントで行う）。
    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError>;

    /// 登録中の接続数
    async fn count_clients(&self) -> usize;
}
