//! ネットワーク KV 型の Repository
//!
//! - `kv`: Key-Value ストアの抽象化
//! - `redis_kv`: Redis 実装
//! - `memory_kv`: インプロセス実装（テスト・単一プロセス用）
//! - `record`: 保存するレコードの形式とキーのレイアウト

pub mod kv;
mod memory_kv;
mod questionnaire;
mod record;
mod redis_kv;

pub use kv::{KeyValueError, KeyValueStore, ScanPage, SetMode};
pub use memory_kv::InMemoryKeyValueStore;
pub use questionnaire::{NetworkedQuestionnaireRepository, SCAN_PAGE_LIMIT};
pub use redis_kv::RedisKeyValueStore;
