//! HTTP API のエラーレスポンス
//!
//! すべてのエラーは `{"error":{"code":"...","message":"..."}}` の形で返します。
//! 500 系の詳細はログにだけ出し、レスポンスには含めません。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    domain::{RepositoryError, ValueObjectError},
    usecase::{
        AdmissionError, AskError, ConnectError, CreateQuestionnaireError, HostActionError,
        VoteError,
    },
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        if e.is_not_found() {
            return ApiError::NotFound(e.to_string());
        }
        match e {
            RepositoryError::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(e: AdmissionError) -> Self {
        match e {
            AdmissionError::Rejected { .. } => ApiError::TooManyRequests(e.to_string()),
            AdmissionError::Count(inner) => inner.into(),
        }
    }
}

impl From<CreateQuestionnaireError> for ApiError {
    fn from(e: CreateQuestionnaireError) -> Self {
        match e {
            CreateQuestionnaireError::Admission(inner) => inner.into(),
            CreateQuestionnaireError::Factory(inner) => ApiError::Internal(inner.to_string()),
            CreateQuestionnaireError::Repository(inner) => inner.into(),
        }
    }
}

impl From<AskError> for ApiError {
    fn from(e: AskError) -> Self {
        match e {
            AskError::Admission(inner) => inner.into(),
            AskError::Factory(inner) => ApiError::Internal(inner.to_string()),
            AskError::Repository(inner) => inner.into(),
        }
    }
}

impl From<VoteError> for ApiError {
    fn from(e: VoteError) -> Self {
        match e {
            VoteError::AlreadyVoted(inner) => ApiError::Conflict(inner.to_string()),
            VoteError::Repository(inner) => inner.into(),
        }
    }
}

impl From<HostActionError> for ApiError {
    fn from(e: HostActionError) -> Self {
        match e {
            HostActionError::NotHost => ApiError::Forbidden,
            HostActionError::Repository(inner) => inner.into(),
        }
    }
}

impl From<ConnectError> for ApiError {
    fn from(e: ConnectError) -> Self {
        match e {
            ConnectError::Admission(inner) => inner.into(),
            ConnectError::Repository(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuestionId, QuestionnaireId};

    #[test]
    fn test_answered_question_maps_to_not_found() {
        // テスト項目: 回答済みの質問への投票は 404 になる
        let id = QuestionId::new("q1".to_string()).unwrap();
        let error: ApiError = VoteError::Repository(RepositoryError::QuestionAnswered(id)).into();

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_admission_rejection_maps_to_429() {
        // テスト項目: 上限による拒否は 429 になる
        let error: ApiError = AskError::Admission(AdmissionError::Rejected {
            current: 100,
            limit: 100,
        })
        .into();

        assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(error.code(), "too_many_requests");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        // テスト項目: 500 のメッセージに内部の詳細が含まれない
        let error: ApiError = RepositoryError::Backend("connection refused".to_string()).into();

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.to_string(), "internal server error");
    }

    #[test]
    fn test_duplicate_questionnaire_maps_to_conflict() {
        // テスト項目: 同じ ID の Questionnaire の保存は 409 になる
        let id = QuestionnaireId::new("qn1".to_string()).unwrap();
        let error: ApiError = RepositoryError::AlreadyExists(id).into();

        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }
}
