//! Server state: UseCase の組み立てと共有

use std::sync::Arc;

use ama_shared::time::Clock;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionRegistry, QuestionnaireRepository, VoteLedger},
    usecase::{
        AdmissionController, AnswerQuestionUseCase, AskQuestionUseCase, ConnectViewerUseCase,
        CreateQuestionnaireUseCase, DeleteQuestionnaireUseCase, DisconnectViewerUseCase,
        GetQuestionnaireUseCase, GetQuestionsUseCase, GlobalCounter, KeyedCounter, QuestionCount,
        QuestionnaireCount, ViewerCount, VoteQuestionUseCase,
    },
};

use super::cookie::CookieSettings;

/// 上限（ソフトリミット）
#[derive(Debug, Clone, Copy)]
pub struct AdmissionLimits {
    /// 有効な Questionnaire の総数
    pub questionnaires: usize,
    /// Questionnaire ごとの質問数
    pub questions: usize,
    /// Questionnaire ごとの同時視聴者数
    pub viewers: usize,
}

impl Default for AdmissionLimits {
    fn default() -> Self {
        Self {
            questionnaires: 20,
            questions: 100,
            viewers: 100,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub create_questionnaire_usecase: Arc<CreateQuestionnaireUseCase>,
    pub get_questionnaire_usecase: Arc<GetQuestionnaireUseCase>,
    pub delete_questionnaire_usecase: Arc<DeleteQuestionnaireUseCase>,
    pub ask_question_usecase: Arc<AskQuestionUseCase>,
    pub get_questions_usecase: Arc<GetQuestionsUseCase>,
    pub vote_question_usecase: Arc<VoteQuestionUseCase>,
    pub answer_question_usecase: Arc<AnswerQuestionUseCase>,
    pub connect_viewer_usecase: Arc<ConnectViewerUseCase>,
    pub disconnect_viewer_usecase: Arc<DisconnectViewerUseCase>,
    pub cookies: CookieSettings,
    /// 発火すると WebSocket 接続のループが終了する
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Domain 層の実装から UseCase を組み立てる
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        ledger: Arc<dyn VoteLedger>,
        clock: Arc<dyn Clock>,
        limits: AdmissionLimits,
        cookies: CookieSettings,
        shutdown: CancellationToken,
    ) -> Self {
        let questionnaire_count: Arc<dyn GlobalCounter> =
            Arc::new(QuestionnaireCount(repository.clone()));
        let question_count: Arc<dyn KeyedCounter> = Arc::new(QuestionCount(repository.clone()));
        let viewer_count: Arc<dyn KeyedCounter> = Arc::new(ViewerCount(registry.clone()));

        Self {
            create_questionnaire_usecase: Arc::new(CreateQuestionnaireUseCase::new(
                repository.clone(),
                AdmissionController::new(questionnaire_count, limits.questionnaires),
            )),
            get_questionnaire_usecase: Arc::new(GetQuestionnaireUseCase::new(repository.clone())),
            delete_questionnaire_usecase: Arc::new(DeleteQuestionnaireUseCase::new(
                repository.clone(),
            )),
            ask_question_usecase: Arc::new(AskQuestionUseCase::new(
                repository.clone(),
                registry.clone(),
                clock,
                AdmissionController::new(question_count, limits.questions),
            )),
            get_questions_usecase: Arc::new(GetQuestionsUseCase::new(repository.clone())),
            vote_question_usecase: Arc::new(VoteQuestionUseCase::new(
                repository.clone(),
                ledger,
                registry.clone(),
            )),
            answer_question_usecase: Arc::new(AnswerQuestionUseCase::new(
                repository.clone(),
                registry.clone(),
            )),
            connect_viewer_usecase: Arc::new(ConnectViewerUseCase::new(
                repository,
                registry.clone(),
                AdmissionController::new(viewer_count, limits.viewers),
            )),
            disconnect_viewer_usecase: Arc::new(DisconnectViewerUseCase::new(registry)),
            cookies,
            shutdown,
        }
    }
}
