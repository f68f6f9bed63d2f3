//! UseCase: Questionnaire の作成
//!
//! 有効な Questionnaire の総数が上限未満のときだけ作成します。

use std::sync::Arc;

use crate::domain::{
    HostSecretFactory, Questionnaire, QuestionnaireIdFactory, QuestionnaireRepository, Title,
};

use super::{
    admission::{AdmissionController, GlobalCounter},
    error::CreateQuestionnaireError,
};

/// Questionnaire 作成のユースケース
pub struct CreateQuestionnaireUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn QuestionnaireRepository>,
    /// 有効な Questionnaire 数の上限
    admission: AdmissionController<dyn GlobalCounter>,
}

impl CreateQuestionnaireUseCase {
    /// 新しい CreateQuestionnaireUseCase を作成
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        admission: AdmissionController<dyn GlobalCounter>,
    ) -> Self {
        Self {
            repository,
            admission,
        }
    }

    /// Questionnaire を作成し、ホストシークレットを含むエンティティを返す
    pub async fn execute(&self, title: Title) -> Result<Questionnaire, CreateQuestionnaireError> {
        let repository = &self.repository;
        self.admission
            .admit(move || async move {
                let questionnaire = Questionnaire::new(
                    QuestionnaireIdFactory::generate()?,
                    title,
                    HostSecretFactory::generate()?,
                );
                repository.save_questionnaire(questionnaire.clone()).await?;
                tracing::info!(questionnaire = %questionnaire.id, "Questionnaire created");
                Ok::<_, CreateQuestionnaireError>(questionnaire)
            })
            .await
    }
}
