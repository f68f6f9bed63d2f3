//! UseCase: 質問を回答済みにする（ホストのみ）

use std::sync::Arc;

use crate::{
    domain::{ConnectionRegistry, QuestionId, QuestionnaireId, QuestionnaireRepository},
    infrastructure::dto::websocket::{AnswerDetails, RoomEvent},
};

use super::{error::HostActionError, host::authorize_host, publish::publish};

/// 回答済みにするユースケース
pub struct AnswerQuestionUseCase {
    repository: Arc<dyn QuestionnaireRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl AnswerQuestionUseCase {
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// `host_secret` がホストシークレットと一致する場合だけ回答済みにし、answer を配信する
    pub async fn execute(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
        host_secret: &str,
    ) -> Result<(), HostActionError> {
        authorize_host(self.repository.as_ref(), questionnaire_id, host_secret).await?;
        self.repository.answer(questionnaire_id, question_id).await?;
        tracing::info!(
            questionnaire = %questionnaire_id,
            question = %question_id,
            "Question answered"
        );

        let event = RoomEvent::Answer(AnswerDetails {
            id: question_id.as_str().to_string(),
        });
        publish(self.registry.as_ref(), questionnaire_id, &event).await;
        Ok(())
    }
}
