//! ドメイン層のエラー型

use thiserror::Error;

use super::{QuestionId, QuestionnaireId};

/// Value Object の生成失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{kind} must be at most {max} characters")]
    TooLong { kind: &'static str, max: usize },

    #[error("{0} contains invalid characters")]
    InvalidCharacters(&'static str),
}

/// ID・シークレット生成の失敗（OS の乱数源が使えない場合）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to generate {kind}: {reason}")]
pub struct FactoryError {
    pub kind: &'static str,
    pub reason: String,
}

/// Repository（ストレージ）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("questionnaire {0} not found")]
    QuestionnaireNotFound(QuestionnaireId),

    #[error("question {0} not found")]
    QuestionNotFound(QuestionId),

    /// 回答済みの質問には投票できない
    #[error("question {0} is already answered")]
    QuestionAnswered(QuestionId),

    #[error("questionnaire {0} already exists")]
    AlreadyExists(QuestionnaireId),

    /// キー列挙が 1 ページに収まらない（部分的な結果は返さない）
    #[error("more than {limit} {what} stored")]
    CapacityExceeded { what: &'static str, limit: usize },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("corrupted record at {key}: {reason}")]
    Corrupted { key: String, reason: String },
}

impl RepositoryError {
    /// 「操作対象が存在しない」分類に属するか
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::QuestionnaireNotFound(_) | Self::QuestionNotFound(_) | Self::QuestionAnswered(_)
        )
    }
}

/// ブロードキャストのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("room {0} does not exist")]
    RoomNotFound(QuestionnaireId),
}

/// 投票台帳のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteLedgerError {
    #[error("already voted on question {question}")]
    AlreadyVoted { question: QuestionId },
}
