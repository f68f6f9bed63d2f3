//! UseCase 層のエラー型

use thiserror::Error;

use super::admission::AdmissionError;
use crate::domain::{FactoryError, RepositoryError, VoteLedgerError};

/// Questionnaire 作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateQuestionnaireError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 質問投稿のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 投票のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error(transparent)]
    AlreadyVoted(#[from] VoteLedgerError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ホスト操作（回答・削除）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostActionError {
    #[error("host secret does not match")]
    NotHost,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 視聴者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
