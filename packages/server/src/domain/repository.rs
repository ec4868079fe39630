//! Repository trait 定義
//!
//! ドメイン層が必要とする共有状態ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 変更系のメソッドは、変更後の該当スライスを返します。呼び出し側はそれを
//! そのままブロードキャストできます。

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionId, ReactionRequest, ReactionToggle, RepositoryError, SafetyReport,
    Snapshot, Timestamp, UserName,
};

/// State Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// 共有状態全体のスナップショットを取得
    async fn snapshot(&self) -> Snapshot;

    /// 安否報告を追加し、報告リスト全体を返す
    async fn add_report(&self, report: SafetyReport) -> Result<Vec<SafetyReport>, RepositoryError>;

    /// チャットメッセージを追加し、メッセージリスト全体を返す
    async fn add_message(&self, message: ChatMessage) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// リアクションをトグルし、結果とメッセージリスト全体を返す
    async fn toggle_reaction(
        &self,
        request: ReactionRequest,
    ) -> Result<(ReactionToggle, Vec<ChatMessage>), RepositoryError>;

    /// 入力中状態を開始し、入力中ユーザー一覧を返す
    async fn start_typing(
        &self,
        name: UserName,
        now: Timestamp,
    ) -> Result<Vec<UserName>, RepositoryError>;

    /// 入力中状態を終了し、入力中ユーザー一覧を返す
    async fn stop_typing(&self, name: &UserName) -> Result<Vec<UserName>, RepositoryError>;

    /// `cutoff` より前に開始した入力中状態を削除する
    ///
    /// 何か削除された場合のみ、残りの入力中ユーザー一覧を返す
    async fn expire_typing(&self, cutoff: Timestamp) -> Option<Vec<UserName>>;

    /// 安否報告と入力中状態をクリアし、リセット後のスナップショットを返す
    async fn reset(&self) -> Snapshot;

    /// 接続にユーザー名を紐づける
    async fn bind_identity(&self, connection_id: ConnectionId, name: UserName);

    /// 接続の紐づけを解除し、紐づいていたユーザー名を返す
    async fn release_identity(&self, connection_id: &ConnectionId) -> Option<UserName>;
}
