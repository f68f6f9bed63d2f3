//! Request handlers.

mod http;
mod websocket;

pub use http::{
    answer_question, ask_question, create_questionnaire, delete_questionnaire, get_questionnaire,
    get_questions, health_check, vote_question,
};
pub use websocket::websocket_handler;
