//! UseCase: 質問への投票
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - VoteQuestionUseCase::execute() メソッド
//! - 投票台帳による二重投票の防止、投票数の加算、vote イベントの配信
//!
//! ### なぜこのテストが必要か
//! - 同じ投票者が 2 回投票しても投票数が 1 しか増えないことを保証する
//! - ストレージ側で投票が失敗した場合に投票権が消費されないことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：投票と配信
//! - 異常系：二重投票、回答済みの質問への投票、存在しない質問
//! - エッジケース：Ballot の失効後の再投票

use std::sync::Arc;

use crate::{
    domain::{
        ConnectionRegistry, QuestionId, QuestionnaireId, QuestionnaireRepository, VoteLedger,
        VoterToken,
    },
    infrastructure::dto::websocket::{RoomEvent, VoteDetails},
};

use super::{error::VoteError, publish::publish};

/// 投票のユースケース
pub struct VoteQuestionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn QuestionnaireRepository>,
    /// 投票台帳（二重投票の防止）
    ledger: Arc<dyn VoteLedger>,
    /// ConnectionRegistry（Room への配信の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl VoteQuestionUseCase {
    /// 新しい VoteQuestionUseCase を作成
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        ledger: Arc<dyn VoteLedger>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            ledger,
            registry,
        }
    }

    /// 投票を実行し、新しい投票数を返す
    ///
    /// 1. 投票台帳に記録（二重投票なら `VoteError::AlreadyVoted`）
    /// 2. ストレージの投票数を加算（失敗したら台帳の記録を取り消す）
    /// 3. Room の視聴者に vote を配信
    pub async fn execute(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
        voter: &VoterToken,
    ) -> Result<u16, VoteError> {
        self.ledger.record(question_id, voter).await?;

        let votes = match self.repository.vote(questionnaire_id, question_id).await {
            Ok(votes) => votes,
            Err(e) => {
                self.ledger.retract(question_id, voter).await;
                return Err(e.into());
            }
        };
        tracing::debug!(
            questionnaire = %questionnaire_id,
            question = %question_id,
            votes,
            "Vote recorded"
        );

        let event = RoomEvent::Vote(VoteDetails {
            id: question_id.as_str().to_string(),
            votes,
        });
        publish(self.registry.as_ref(), questionnaire_id, &event).await;

        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RepositoryError, VoteLedgerError},
        infrastructure::vote_ledger::InMemoryVoteLedger,
        usecase::test_support::Fixture,
    };
    use std::time::Duration;

    fn voter(token: &str) -> VoterToken {
        VoterToken::new(token.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_vote_increments_and_broadcasts() {
        // テスト項目: 投票数が増え、視聴者に vote が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let q = fixture.question(&qn, "q1").await;
        let mut viewer = fixture.viewer(&qn).await;
        let usecase = fixture.vote_question_usecase();

        // when (操作):
        let votes = usecase.execute(&qn, &q, &voter("v1")).await;

        // then (期待する結果):
        assert_eq!(votes, Ok(1));
        let payload: serde_json::Value =
            serde_json::from_str(&viewer.recv().await.unwrap()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({"event": "vote", "details": {"id": "q1", "votes": 1}})
        );
    }

    #[tokio::test]
    async fn test_duplicate_vote_counts_once() {
        // テスト項目: 同じ投票者の 2 回目の投票は拒否され、投票数は 1 のまま
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let q = fixture.question(&qn, "q1").await;
        let usecase = fixture.vote_question_usecase();
        usecase.execute(&qn, &q, &voter("v1")).await.unwrap();

        // when (操作):
        let result = usecase.execute(&qn, &q, &voter("v1")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(VoteError::AlreadyVoted(VoteLedgerError::AlreadyVoted {
                question: q.clone()
            }))
        );
        let questions = fixture.repository.get_questions(&qn).await.unwrap();
        assert_eq!(questions[0].votes, 1);
    }

    #[tokio::test]
    async fn test_failed_storage_vote_does_not_consume_ballot() {
        // テスト項目: 存在しない質問への投票は台帳に残らない
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let missing = QuestionId::new("missing".to_string()).unwrap();
        let usecase = fixture.vote_question_usecase();

        // when (操作):
        let result = usecase.execute(&qn, &missing, &voter("v1")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(VoteError::Repository(RepositoryError::QuestionNotFound(
                missing
            )))
        );
        assert_eq!(fixture.ledger.ballot_count().await, 0);
    }

    #[tokio::test]
    async fn test_vote_on_answered_question_is_rejected() {
        // テスト項目: 回答済みの質問への投票は QuestionAnswered で拒否される
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let q = fixture.question(&qn, "q1").await;
        fixture.repository.answer(&qn, &q).await.unwrap();
        let usecase = fixture.vote_question_usecase();

        // when (操作):
        let result = usecase.execute(&qn, &q, &voter("v1")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(VoteError::Repository(RepositoryError::QuestionAnswered(
                q.clone()
            )))
        );
        let questions = fixture.repository.get_questions(&qn).await.unwrap();
        assert_eq!(questions[0].votes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_ballot_reopens_voting() {
        // テスト項目: TTL 50ms の経過後は同じ投票者が再び投票でき、投票数が 2 になる
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let q = fixture.question(&qn, "q1").await;
        let ledger = Arc::new(InMemoryVoteLedger::new(Duration::from_millis(50)));
        let usecase = VoteQuestionUseCase::new(
            fixture.repository.clone(),
            ledger,
            fixture.registry.clone(),
        );
        usecase.execute(&qn, &q, &voter("t")).await.unwrap();

        // when (操作):
        tokio::time::sleep(Duration::from_millis(100)).await;
        let result = usecase.execute(&qn, &q, &voter("t")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
    }
}
