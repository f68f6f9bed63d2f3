//! Repository 実装
//!
//! - `inmemory`: プロセス内の HashMap（高速・非永続）
//! - `networked`: TTL 付きの Key-Value ストア（Redis）

pub mod inmemory;
pub mod networked;

pub use inmemory::InMemoryQuestionnaireRepository;
pub use networked::{
    InMemoryKeyValueStore, KeyValueStore, NetworkedQuestionnaireRepository, RedisKeyValueStore,
};
