//! HTTP API のリクエスト / レスポンス DTO

use serde::{Deserialize, Serialize};

/// `POST /questionnaires`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionnaireRequest {
    pub title: String,
}

/// `POST /questionnaires/{id}/questions`
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

/// Questionnaire のメタデータ（ホストシークレットは含めない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireDto {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDto {
    pub id: String,
    pub question: String,
    pub votes: u16,
    pub answered: bool,
    /// RFC 3339 形式の投稿時刻
    pub asked_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionListDto {
    pub questions: Vec<QuestionDto>,
}

/// `PUT .../vote` のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResultDto {
    pub id: String,
    pub votes: u16,
}
