//! VoteLedger 実装と期限切れ Ballot の掃除タスク

mod inmemory;
mod sweeper;

pub use inmemory::InMemoryVoteLedger;
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, run_ballot_sweeper};
