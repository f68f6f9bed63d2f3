//! Entity 定義
//!
//! - `Questionnaire`: 1 回の Q&A セッション。作成後は不変
//! - `Question`: Questionnaire に投稿された質問。投票数と回答済みフラグを持つ

use super::value_object::{
    HostSecret, QuestionId, QuestionText, QuestionnaireId, Timestamp, Title,
};

/// Q&A セッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub title: Title,
    /// 作成者だけが知るトークン。ホスト操作の認可に使う
    pub host_secret: HostSecret,
}

impl Questionnaire {
    pub fn new(id: QuestionnaireId, title: Title, host_secret: HostSecret) -> Self {
        Self {
            id,
            title,
            host_secret,
        }
    }
}

/// 質問
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub questionnaire_id: QuestionnaireId,
    pub text: QuestionText,
    pub votes: u16,
    pub answered: bool,
    /// 投稿時刻。挿入順の復元に使う
    pub asked_at: Timestamp,
}

impl Question {
    /// 投票 0、未回答の状態で質問を作成
    pub fn new(
        id: QuestionId,
        questionnaire_id: QuestionnaireId,
        text: QuestionText,
        asked_at: Timestamp,
    ) -> Self {
        Self {
            id,
            questionnaire_id,
            text,
            votes: 0,
            answered: false,
            asked_at,
        }
    }

    /// 投票を受け付ける状態か（回答済みの質問は締め切り）
    pub fn accepts_votes(&self) -> bool {
        !self.answered
    }

    /// 投票数を 1 増やし、新しい投票数を返す
    ///
    /// `u16::MAX` で頭打ちになる。
    pub fn add_vote(&mut self) -> u16 {
        self.votes = self.votes.saturating_add(1);
        self.votes
    }

    /// 回答済みにする（冪等）
    pub fn mark_answered(&mut self) {
        self.answered = true;
    }
}
