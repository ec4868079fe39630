//! InMemory State Repository 実装
//!
//! ドメイン層が定義する StateRepository trait の具体的な実装。
//! `FamilyState` 集約をそのままプロセスメモリ上に保持します。
//! プロセスが再起動すると状態はすべて失われます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ConnectionId, FamilyState, ReactionRequest, ReactionToggle, RepositoryError,
    SafetyReport, Snapshot, StateRepository, Timestamp, UserName,
};

/// インメモリ State Repository 実装
pub struct InMemoryStateRepository {
    /// 共有状態（集約）
    state: Arc<Mutex<FamilyState>>,
}

impl InMemoryStateRepository {
    /// 新しい InMemoryStateRepository を作成
    pub fn new(state: Arc<Mutex<FamilyState>>) -> Self {
        Self { state }
    }
}

impl Default for InMemoryStateRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(FamilyState::new())))
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn snapshot(&self) -> Snapshot {
        let state = self.state.lock().await;
        state.snapshot()
    }

    async fn add_report(&self, report: SafetyReport) -> Result<Vec<SafetyReport>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.report_safety(report)?;
        Ok(state.reports().to_vec())
    }

    async fn add_message(&self, message: ChatMessage) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.add_message(message)?;
        Ok(state.messages().to_vec())
    }

    async fn toggle_reaction(
        &self,
        request: ReactionRequest,
    ) -> Result<(ReactionToggle, Vec<ChatMessage>), RepositoryError> {
        let mut state = self.state.lock().await;
        let toggle = state.toggle_reaction(request)?;
        Ok((toggle, state.messages().to_vec()))
    }

    async fn start_typing(
        &self,
        name: UserName,
        now: Timestamp,
    ) -> Result<Vec<UserName>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.start_typing(name, now)?;
        Ok(state.typing_users())
    }

    async fn stop_typing(&self, name: &UserName) -> Result<Vec<UserName>, RepositoryError> {
        let mut state = self.state.lock().await;
        state.stop_typing(name)?;
        Ok(state.typing_users())
    }

    async fn expire_typing(&self, cutoff: Timestamp) -> Option<Vec<UserName>> {
        let mut state = self.state.lock().await;
        let expired = state.expire_typing(cutoff);
        if expired.is_empty() {
            None
        } else {
            Some(state.typing_users())
        }
    }

    async fn reset(&self) -> Snapshot {
        let mut state = self.state.lock().await;
        state.reset();
        state.snapshot()
    }

    async fn bind_identity(&self, connection_id: ConnectionId, name: UserName) {
        let mut state = self.state.lock().await;
        state.bind_identity(connection_id, name);
    }

    async fn release_identity(&self, connection_id: &ConnectionId) -> Option<UserName> {
        let mut state = self.state.lock().await;
        state.release_identity(connection_id)
    }
}
