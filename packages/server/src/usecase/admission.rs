//! AdmissionController: リソースを作る操作の前に上限をチェックする
//!
//! `current = count()` が `limit` 以上なら拒否し、内側の操作は呼ばない。
//!
//! チェックと実行の間にロックはないため、並行したリクエストが同時に
//! `current < limit` を観測して両方通ることがあります（上限をわずかに超えうる）。
//! 上限はソフトリミットとして扱います。

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ConnectionRegistry, QuestionnaireId, QuestionnaireRepository, RepositoryError};

/// AdmissionController のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("admission rejected: {current} of {limit} in use")]
    Rejected { current: usize, limit: usize },

    #[error("failed to count current usage: {0}")]
    Count(RepositoryError),
}

/// キーを取らないカウンタ（例: 有効な Questionnaire の総数）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GlobalCounter: Send + Sync {
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Questionnaire ごとのカウンタ（例: 質問数、視聴者数）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyedCounter: Send + Sync {
    async fn count(&self, key: &QuestionnaireId) -> Result<usize, RepositoryError>;
}

/// 上限チェック付きで操作を実行する
pub struct AdmissionController<C: ?Sized> {
    counter: Arc<C>,
    limit: usize,
}

impl<C: ?Sized> AdmissionController<C> {
    pub fn new(counter: Arc<C>, limit: usize) -> Self {
        Self { counter, limit }
    }

    fn check(&self, current: usize) -> Result<(), AdmissionError> {
        if current >= self.limit {
            tracing::info!(current, limit = self.limit, "Admission rejected");
            return Err(AdmissionError::Rejected {
                current,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

impl<C: GlobalCounter + ?Sized> AdmissionController<C> {
    /// 上限未満なら `op` を実行し、その結果を返す
    pub async fn admit<F, Fut, T, E>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AdmissionError>,
    {
        let current = self.counter.count().await.map_err(AdmissionError::Count)?;
        self.check(current)?;
        op().await
    }
}

impl<C: KeyedCounter + ?Sized> AdmissionController<C> {
    /// `key` のカウントが上限未満なら `op` を実行し、その結果を返す
    pub async fn admit_keyed<F, Fut, T, E>(&self, key: &QuestionnaireId, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AdmissionError>,
    {
        let current = self
            .counter
            .count(key)
            .await
            .map_err(AdmissionError::Count)?;
        self.check(current)?;
        op().await
    }
}

// ========================================
// カウンタのアダプタ
// ========================================

/// 保存されている Questionnaire の数
pub struct QuestionnaireCount(pub Arc<dyn QuestionnaireRepository>);

#[async_trait]
impl GlobalCounter for QuestionnaireCount {
    async fn count(&self) -> Result<usize, RepositoryError> {
        self.0.count_questionnaires().await
    }
}

/// Questionnaire に属する質問の数
pub struct QuestionCount(pub Arc<dyn QuestionnaireRepository>);

#[async_trait]
impl KeyedCounter for QuestionCount {
    async fn count(&self, key: &QuestionnaireId) -> Result<usize, RepositoryError> {
        self.0.count_questions(key).await
    }
}

/// Room に接続中の視聴者の数
pub struct ViewerCount(pub Arc<dyn ConnectionRegistry>);

#[async_trait]
impl KeyedCounter for ViewerCount {
    async fn count(&self, key: &QuestionnaireId) -> Result<usize, RepositoryError> {
        Ok(self.0.count_connections(key).await)
    }
}
