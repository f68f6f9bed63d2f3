//! UseCase テスト用のフィクスチャ

use std::sync::Arc;

use ama_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRegistry, HostSecret, Question, QuestionId,
        QuestionText, Questionnaire, QuestionnaireId, QuestionnaireRepository, Timestamp, Title,
    },
    infrastructure::{
        connection_registry::WebSocketConnectionRegistry,
        repository::InMemoryQuestionnaireRepository, vote_ledger::InMemoryVoteLedger,
    },
};

use super::{
    AnswerQuestionUseCase, AskQuestionUseCase, CreateQuestionnaireUseCase,
    VoteQuestionUseCase,
    admission::{
        AdmissionController, GlobalCounter, KeyedCounter, QuestionCount, QuestionnaireCount,
    },
};

pub const HOST_SECRET: &str = "host-secret";
pub const NOW: i64 = 1_700_000_000_000;

pub struct Fixture {
    pub repository: Arc<InMemoryQuestionnaireRepository>,
    pub registry: Arc<WebSocketConnectionRegistry>,
    pub ledger: Arc<InMemoryVoteLedger>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryQuestionnaireRepository::new()),
            registry: Arc::new(WebSocketConnectionRegistry::new()),
            ledger: Arc::new(InMemoryVoteLedger::new(std::time::Duration::from_secs(60))),
        }
    }

    pub fn create_questionnaire_usecase(&self, limit: usize) -> CreateQuestionnaireUseCase {
        let counter: Arc<dyn GlobalCounter> =
            Arc::new(QuestionnaireCount(self.repository.clone()));
        CreateQuestionnaireUseCase::new(
            self.repository.clone(),
            AdmissionController::new(counter, limit),
        )
    }

    pub fn ask_question_usecase(&self, limit: usize) -> AskQuestionUseCase {
        let counter: Arc<dyn KeyedCounter> = Arc::new(QuestionCount(self.repository.clone()));
        AskQuestionUseCase::new(
            self.repository.clone(),
            self.registry.clone(),
            Arc::new(FixedClock::new(NOW)),
            AdmissionController::new(counter, limit),
        )
    }

    pub fn vote_question_usecase(&self) -> VoteQuestionUseCase {
        VoteQuestionUseCase::new(
            self.repository.clone(),
            self.ledger.clone(),
            self.registry.clone(),
        )
    }

    pub fn answer_question_usecase(&self) -> AnswerQuestionUseCase {
        AnswerQuestionUseCase::new(self.repository.clone(), self.registry.clone())
    }

    /// ホストシークレットが既知の Questionnaire を保存する
    pub async fn questionnaire(&self, id: &str) -> QuestionnaireId {
        let id = QuestionnaireId::new(id.to_string()).unwrap();
        self.repository
            .save_questionnaire(Questionnaire::new(
                id.clone(),
                Title::new("Test".to_string()).unwrap(),
                HostSecret::new(HOST_SECRET.to_string()).unwrap(),
            ))
            .await
            .unwrap();
        id
    }

    pub async fn question(&self, questionnaire_id: &QuestionnaireId, id: &str) -> QuestionId {
        let id = QuestionId::new(id.to_string()).unwrap();
        self.repository
            .save_question(
                questionnaire_id,
                Question::new(
                    id.clone(),
                    questionnaire_id.clone(),
                    QuestionText::new(format!("question {id}")).unwrap(),
                    Timestamp::new(NOW),
                ),
            )
            .await
            .unwrap();
        id
    }

    /// Room に視聴者を 1 人参加させ、受信チャンネルを返す
    pub async fn viewer(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry
            .join(
                questionnaire_id,
                Connection::new(ConnectionId::generate(), tx),
            )
            .await;
        rx
    }
}
