//! 期限切れ Ballot の掃除タスク
//!
//! 一定間隔で `InMemoryVoteLedger::sweep_expired` を呼びます。
//! キャンセルトークンが発火すると、実行中の掃除を終えてから終了します。

use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::InMemoryVoteLedger;

/// 掃除間隔の既定値
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3);

/// 掃除タスクを開始する。キャンセルされるまで戻らない
pub async fn run_ballot_sweeper(
    ledger: Arc<InMemoryVoteLedger>,
    every: Duration,
    cancel_token: CancellationToken,
) {
    tracing::info!(interval_ms = every.as_millis() as u64, "Starting ballot sweeper");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = ledger.sweep_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired ballots");
                }
            }
            _ = cancel_token.cancelled() => {
                tracing::info!("Ballot sweeper received shutdown signal, exiting");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuestionId, VoteLedger, VoterToken};

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_expired_ballots_on_tick() {
        // テスト項目: 掃除タスクが期限切れの Ballot を削除する
        // given (前提条件):
        let ledger = Arc::new(InMemoryVoteLedger::new(Duration::from_millis(50)));
        ledger
            .record(
                &QuestionId::new("q1".to_string()).unwrap(),
                &VoterToken::new("t".to_string()).unwrap(),
            )
            .await
            .unwrap();
        let cancel_token = CancellationToken::new();
        let task = tokio::spawn(run_ballot_sweeper(
            ledger.clone(),
            Duration::from_millis(20),
            cancel_token.clone(),
        ));

        // when (操作):
        tokio::time::sleep(Duration::from_millis(100)).await;

        // then (期待する結果):
        assert_eq!(ledger.ballot_count().await, 0);
        cancel_token.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_cancel() {
        // テスト項目: キャンセルトークンの発火でタスクが終了する
        // given (前提条件):
        let ledger = Arc::new(InMemoryVoteLedger::new(Duration::from_secs(1)));
        let cancel_token = CancellationToken::new();
        let task = tokio::spawn(run_ballot_sweeper(
            ledger,
            DEFAULT_SWEEP_INTERVAL,
            cancel_token.clone(),
        ));

        // when (操作):
        cancel_token.cancel();

        // then (期待する結果):
        assert!(task.await.is_ok());
    }
}
