//! ホスト認可の共通処理

use crate::domain::{Questionnaire, QuestionnaireId, QuestionnaireRepository};

use super::error::HostActionError;

/// 提示されたシークレットが Questionnaire のホストシークレットと一致するか確認する
pub(crate) async fn authorize_host(
    repository: &dyn QuestionnaireRepository,
    questionnaire_id: &QuestionnaireId,
    presented_secret: &str,
) -> Result<Questionnaire, HostActionError> {
    let questionnaire = repository.get_questionnaire(questionnaire_id).await?;
    if !questionnaire.host_secret.matches(presented_secret) {
        tracing::warn!(questionnaire = %questionnaire_id, "Host secret mismatch");
        return Err(HostActionError::NotHost);
    }
    Ok(questionnaire)
}
