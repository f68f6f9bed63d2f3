//! UseCase 層
//!
//! 1 つの操作につき 1 つの構造体を持ち、Domain 層の trait（`Arc<dyn Trait>`）だけに依存します。

pub mod admission;
mod answer_question;
mod ask_question;
mod connect_viewer;
mod create_questionnaire;
mod delete_questionnaire;
mod disconnect_viewer;
pub mod error;
mod get_questionnaire;
mod get_questions;
mod host;
mod publish;
#[cfg(test)]
mod test_support;
mod vote_question;

pub use admission::{
    AdmissionController, AdmissionError, GlobalCounter, KeyedCounter, QuestionCount,
    QuestionnaireCount, ViewerCount,
};
pub use answer_question::AnswerQuestionUseCase;
pub use ask_question::AskQuestionUseCase;
pub use connect_viewer::{ConnectViewerUseCase, RoomMembership};
pub use create_questionnaire::CreateQuestionnaireUseCase;
pub use delete_questionnaire::DeleteQuestionnaireUseCase;
pub use disconnect_viewer::DisconnectViewerUseCase;
pub use error::{AskError, ConnectError, CreateQuestionnaireError, HostActionError, VoteError};
pub use get_questionnaire::GetQuestionnaireUseCase;
pub use get_questions::GetQuestionsUseCase;
pub use vote_question::VoteQuestionUseCase;
