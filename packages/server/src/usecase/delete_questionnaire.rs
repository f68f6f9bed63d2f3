//! UseCase: Questionnaire の削除（ホストのみ）

use std::sync::Arc;

use crate::domain::{QuestionnaireId, QuestionnaireRepository};

use super::{error::HostActionError, host::authorize_host};

/// Questionnaire 削除のユースケース
pub struct DeleteQuestionnaireUseCase {
    repository: Arc<dyn QuestionnaireRepository>,
}

impl DeleteQuestionnaireUseCase {
    pub fn new(repository: Arc<dyn QuestionnaireRepository>) -> Self {
        Self { repository }
    }

    /// Questionnaire とその質問をすべて削除する
    pub async fn execute(
        &self,
        questionnaire_id: &QuestionnaireId,
        host_secret: &str,
    ) -> Result<(), HostActionError> {
        authorize_host(self.repository.as_ref(), questionnaire_id, host_secret).await?;
        self.repository
            .delete_questionnaire(questionnaire_id)
            .await?;
        tracing::info!(questionnaire = %questionnaire_id, "Questionnaire deleted");
        Ok(())
    }
}
