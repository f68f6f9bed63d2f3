//! インメモリ VoteLedger 実装
//!
//! 質問ごとの Ballot（投票済みトークンの集合）を 1 つの `Mutex` で守ります。
//! `record` と期限切れの掃除（`sweep_expired`）は同じロックを取るため、
//! 掃除中に `record` が Ballot を書き換えることはありません。
//!
//! Ballot の有効期限は最初の投票時に決まり、以降の投票では延長されません。
//! 期限を過ぎた Ballot は掃除の前でも存在しないものとして扱います。

use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};

use crate::domain::{QuestionId, VoteLedger, VoteLedgerError, VoterToken};

#[derive(Debug)]
struct Ballot {
    expires_at: Instant,
    voters: HashSet<VoterToken>,
}

impl Ballot {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// インメモリ VoteLedger 実装
#[derive(Debug)]
pub struct InMemoryVoteLedger {
    ttl: Duration,
    ballots: Mutex<HashMap<QuestionId, Ballot>>,
}

impl InMemoryVoteLedger {
    /// `ttl`: Ballot の有効期限（最初の投票からの経過時間）
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ballots: Mutex::new(HashMap::new()),
        }
    }

    /// 期限切れの Ballot を削除し、削除した数を返す
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut ballots = self.ballots.lock().await;
        let before = ballots.len();
        ballots.retain(|_, ballot| !ballot.is_expired(now));
        before - ballots.len()
    }

    /// 保持している Ballot の数
    pub async fn ballot_count(&self) -> usize {
        self.ballots.lock().await.len()
    }
}

#[async_trait]
impl VoteLedger for InMemoryVoteLedger {
    async fn record(&self, question: &QuestionId, voter: &VoterToken) -> Result<(), VoteLedgerError> {
        let now = Instant::now();
        let mut ballots = self.ballots.lock().await;

        let ballot = ballots.entry(question.clone()).or_insert_with(|| Ballot {
            expires_at: now + self.ttl,
            voters: HashSet::new(),
        });
        if ballot.is_expired(now) {
            *ballot = Ballot {
                expires_at: now + self.ttl,
                voters: HashSet::new(),
            };
        }

        if !ballot.voters.insert(voter.clone()) {
            return Err(VoteLedgerError::AlreadyVoted {
                question: question.clone(),
            });
        }
        Ok(())
    }

    async fn retract(&self, question: &QuestionId, voter: &VoterToken) {
        let mut ballots = self.ballots.lock().await;
        if let Some(ballot) = ballots.get_mut(question) {
            ballot.voters.remove(voter);
            if ballot.voters.is_empty() {
                ballots.remove(question);
            }
        }
    }
}
