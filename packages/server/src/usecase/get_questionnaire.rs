//! UseCase: Questionnaire の取得

use std::sync::Arc;

use crate::domain::{Questionnaire, QuestionnaireId, QuestionnaireRepository, RepositoryError};

/// Questionnaire 取得のユースケース
pub struct GetQuestionnaireUseCase {
    repository: Arc<dyn QuestionnaireRepository>,
}

impl GetQuestionnaireUseCase {
    pub fn new(repository: Arc<dyn QuestionnaireRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Questionnaire, RepositoryError> {
        self.repository.get_questionnaire(questionnaire_id).await
    }
}
