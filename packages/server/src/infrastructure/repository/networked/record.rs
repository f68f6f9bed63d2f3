//! Key-Value ストアに保存するレコード（JSON）
//!
//! ```text
//! QA:<questionnaireId>            → {"id","title","host"}
//! <questionnaireId>:<questionId>  → {"id","questionnaire","question","metadata":{"votes","answered"},"asked_at"}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    HostSecret, Question, QuestionId, QuestionText, Questionnaire, QuestionnaireId,
    RepositoryError, Timestamp, Title,
};

/// Questionnaire レコードのキー接頭辞
pub const QUESTIONNAIRE_PREFIX: &str = "QA:";

pub fn questionnaire_key(id: &QuestionnaireId) -> String {
    format!("{QUESTIONNAIRE_PREFIX}{id}")
}

/// ある Questionnaire に属する質問キーの接頭辞
pub fn question_prefix(questionnaire_id: &QuestionnaireId) -> String {
    format!("{questionnaire_id}:")
}

pub fn question_key(questionnaire_id: &QuestionnaireId, question_id: &QuestionId) -> String {
    format!("{questionnaire_id}:{question_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireRecord {
    pub id: String,
    pub title: String,
    pub host: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    pub votes: u16,
    pub answered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub questionnaire: String,
    pub question: String,
    pub metadata: QuestionMetadata,
    pub asked_at: Timestamp,
}

// ========================================
// Domain Entity → Record
// ========================================

impl From<&Questionnaire> for QuestionnaireRecord {
    fn from(model: &Questionnaire) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            title: model.title.as_str().to_string(),
            host: model.host_secret.as_str().to_string(),
        }
    }
}

impl From<&Question> for QuestionRecord {
    fn from(model: &Question) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            questionnaire: model.questionnaire_id.as_str().to_string(),
            question: model.text.as_str().to_string(),
            metadata: QuestionMetadata {
                votes: model.votes,
                answered: model.answered,
            },
            asked_at: model.asked_at,
        }
    }
}

// ========================================
// Record → Domain Entity
// ========================================

impl QuestionnaireRecord {
    pub fn into_entity(self) -> Result<Questionnaire, String> {
        Ok(Questionnaire::new(
            QuestionnaireId::new(self.id).map_err(|e| e.to_string())?,
            Title::new(self.title).map_err(|e| e.to_string())?,
            HostSecret::new(self.host).map_err(|e| e.to_string())?,
        ))
    }
}

impl QuestionRecord {
    pub fn into_entity(self) -> Result<Question, String> {
        let mut question = Question::new(
            QuestionId::new(self.id).map_err(|e| e.to_string())?,
            QuestionnaireId::new(self.questionnaire).map_err(|e| e.to_string())?,
            QuestionText::new(self.question).map_err(|e| e.to_string())?,
            self.asked_at,
        );
        question.votes = self.metadata.votes;
        question.answered = self.metadata.answered;
        Ok(question)
    }
}

/// JSON にエンコード
pub fn encode<T: Serialize>(key: &str, record: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(record).map_err(|e| RepositoryError::Corrupted {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// JSON からデコードし、ドメインエンティティに変換
pub fn decode_questionnaire(key: &str, raw: &str) -> Result<Questionnaire, RepositoryError> {
    serde_json::from_str::<QuestionnaireRecord>(raw)
        .map_err(|e| e.to_string())
        .and_then(QuestionnaireRecord::into_entity)
        .map_err(|reason| RepositoryError::Corrupted {
            key: key.to_string(),
            reason,
        })
}

pub fn decode_question(key: &str, raw: &str) -> Result<Question, RepositoryError> {
    serde_json::from_str::<QuestionRecord>(raw)
        .map_err(|e| e.to_string())
        .and_then(QuestionRecord::into_entity)
        .map_err(|reason| RepositoryError::Corrupted {
            key: key.to_string(),
            reason,
        })
}
