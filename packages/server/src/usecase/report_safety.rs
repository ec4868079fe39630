//! UseCase: 安否報告処理
//!
//! 同じ ID の報告は一度だけ記録されます（冪等な追加）。

use std::sync::Arc;

use crate::domain::{MessagePusher, Notification, SafetyReport, StateRepository};

use super::{error::MutationError, mutation_lock::MutationLock};

/// 安否報告のユースケース
pub struct ReportSafetyUseCase {
    repository: Arc<dyn StateRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    lock: Arc<MutationLock>,
}

impl ReportSafetyUseCase {
    /// 新しい ReportSafetyUseCase を作成
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

    /// 安否報告を記録し、報告リスト全体を全接続にブロードキャストする
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SafetyReport>)` - 更新後の報告リスト
    /// * `Err(MutationError::Ignored)` - 同じ ID が既に報告済み（通知なし）
    pub async fn execute(&self, report: SafetyReport) -> Result<Vec<SafetyReport>, MutationError> {
        let _guard = self.lock.acquire().await;

        let reports = self.repository.add_report(report).await?;
        self.message_pusher
            .broadcast(&Notification::FamilyMembers(reports.clone()))
            .await?;

        Ok(reports)
    }
}
