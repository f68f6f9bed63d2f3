//! Key-Value ストアの抽象化
//!
//! ネットワーク型 Repository が必要とする最小限の操作だけを定義します。
//! 本番では Redis（`RedisKeyValueStore`）、テストではインプロセス実装
//! （`InMemoryKeyValueStore`）を使います。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Key-Value ストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValueError {
    #[error("key-value backend error: {0}")]
    Backend(String),
}

/// 書き込みの条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// 常に上書き
    Always,
    /// キーが存在しない場合のみ書き込む
    IfAbsent,
}

/// 前方一致によるキー列挙の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanPage {
    /// 見つかったキー（最大 `limit` 件）
    pub keys: Vec<String>,
    /// `limit` を超えるキーが存在した
    pub truncated: bool,
}

/// Key-Value ストア
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 値を取得（存在しない・失効済みなら `None`）
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError>;

    /// TTL 付きで書き込む。書き込んだ場合 `true`
    ///
    /// `SetMode::IfAbsent` でキーが既に存在する場合は何もせず `false` を返す。
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        mode: SetMode,
    ) -> Result<bool, KeyValueError>;

    /// 既存のキーの値を置き換える。残りの TTL はそのまま維持する
    ///
    /// キーが存在しない（失効済みを含む）場合は書き込まず `false` を返す。
    async fn replace_keep_ttl(&self, key: &str, value: &str) -> Result<bool, KeyValueError>;

    /// `prefix` で始まるキーを最大 `limit` 件列挙する
    async fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<ScanPage, KeyValueError>;

    /// キーを削除（存在しないキーは無視）
    async fn delete(&self, keys: &[String]) -> Result<(), KeyValueError>;

    /// 残りの TTL（キーが存在しない、または TTL が設定されていない場合は `None`）
    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, KeyValueError>;
}
