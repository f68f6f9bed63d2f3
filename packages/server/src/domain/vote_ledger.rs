//! VoteLedger trait 定義
//!
//! 質問ごとに「誰がもう投票したか」を記録し、二重投票を防ぎます。
//! 記録（Ballot）は最初の投票から TTL が経過すると失効し、その質問へは再び投票できるようになります。

use async_trait::async_trait;

use super::{QuestionId, VoteLedgerError, VoterToken};

/// 投票済みトークンの台帳
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// 投票を記録する
    ///
    /// 有効期限内の同じ `(question, voter)` に対する 2 回目以降の呼び出しは
    /// `VoteLedgerError::AlreadyVoted` を返す。
    async fn record(&self, question: &QuestionId, voter: &VoterToken) -> Result<(), VoteLedgerError>;

    /// `record` を取り消す（後続のストレージ操作が失敗した場合に使う）
    async fn retract(&self, question: &QuestionId, voter: &VoterToken);
}
