//! WebSocket で Room に配信するイベント
//!
//! ```json
//! {"event":"new_question","details":{"id":"...","question":"...","votes":0}}
//! {"event":"vote","details":{"id":"...","votes":1}}
//! {"event":"answer","details":{"id":"..."}}
//! ```

use serde::{Deserialize, Serialize};

/// Room イベント（`event` が種別、`details` が内容）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "details", rename_all = "snake_case")]
pub enum RoomEvent {
    NewQuestion(NewQuestionDetails),
    Vote(VoteDetails),
    Answer(AnswerDetails),
}

impl RoomEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestionDetails {
    pub id: String,
    pub question: String,
    pub votes: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteDetails {
    pub id: String,
    pub votes: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerDetails {
    pub id: String,
}
