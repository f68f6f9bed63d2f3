//! インメモリ Repository 実装

mod questionnaire;

pub use questionnaire::InMemoryQuestionnaireRepository;
