//! UseCase: 質問一覧の取得

use std::sync::Arc;

use crate::domain::{Question, QuestionnaireId, QuestionnaireRepository, RepositoryError};

/// 質問一覧取得のユースケース
pub struct GetQuestionsUseCase {
    repository: Arc<dyn QuestionnaireRepository>,
}

impl GetQuestionsUseCase {
    pub fn new(repository: Arc<dyn QuestionnaireRepository>) -> Self {
        Self { repository }
    }

    /// 投稿順の質問一覧
    pub async fn execute(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Vec<Question>, RepositoryError> {
        self.repository.get_questions(questionnaire_id).await
    }
}
