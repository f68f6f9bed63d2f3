//! Conversion logic from domain entities to DTOs.

use ama_shared::time::timestamp_to_rfc3339;

use crate::domain::entity;
use crate::infrastructure::dto::{http, websocket};

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&entity::Questionnaire> for http::QuestionnaireDto {
    fn from(model: &entity::Questionnaire) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            title: model.title.as_str().to_string(),
        }
    }
}

impl From<&entity::Question> for http::QuestionDto {
    fn from(model: &entity::Question) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            question: model.text.as_str().to_string(),
            votes: model.votes,
            answered: model.answered,
            asked_at: timestamp_to_rfc3339(model.asked_at.value()),
        }
    }
}

impl From<Vec<entity::Question>> for http::QuestionListDto {
    fn from(models: Vec<entity::Question>) -> Self {
        Self {
            questions: models.iter().map(http::QuestionDto::from).collect(),
        }
    }
}

// ========================================
// Domain Entity → WebSocket Event
// ========================================

impl From<&entity::Question> for websocket::NewQuestionDetails {
    fn from(model: &entity::Question) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            question: model.text.as_str().to_string(),
            votes: model.votes,
        }
    }
}
