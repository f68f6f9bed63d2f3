//! インプロセスの Key-Value ストア
//!
//! Redis と同じく、キーごとの TTL と前方一致列挙を持ちます。
//! 失効したキーは読み取り時に存在しないものとして扱われます。
//! 時刻は `tokio::time::Instant` を使うため、テストでは時間を一時停止・早送りできます。

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, time::Instant};

use super::kv::{KeyValueError, KeyValueStore, ScanPage, SetMode};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// インプロセスの Key-Value ストア実装
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        mode: SetMode,
    ) -> Result<bool, KeyValueError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if mode == SetMode::IfAbsent && entries.get(key).is_some_and(|e| e.is_live(now)) {
            return Ok(false);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(now + ttl),
            },
        );
        Ok(true)
    }

    async fn replace_keep_ttl(&self, key: &str, value: &str) -> Result<bool, KeyValueError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if entry.is_live(now) => {
                entry.value = value.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<ScanPage, KeyValueError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        let mut matching = entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| key.clone());

        let keys: Vec<String> = matching.by_ref().take(limit).collect();
        let truncated = matching.next().is_some();
        Ok(ScanPage { keys, truncated })
    }

    async fn delete(&self, keys: &[String]) -> Result<(), KeyValueError> {
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, KeyValueError> {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        // テスト項目: TTL が経過したキーは読めなくなる
        // given (前提条件):
        let kv = InMemoryKeyValueStore::new();
        kv.set_with_ttl("a", "1", TTL, SetMode::Always).await.unwrap();

        // when (操作):
        tokio::time::advance(TTL + Duration::from_millis(1)).await;

        // then (期待する結果):
        assert_eq!(kv.get("a").await.unwrap(), None);
        assert_eq!(kv.scan_prefix("a", 10).await.unwrap(), ScanPage::default());
    }

    #[tokio::test]
    async fn test_set_if_absent_does_not_overwrite() {
        // テスト項目: IfAbsent は既存のキーを上書きしない
        // given (前提条件):
        let kv = InMemoryKeyValueStore::new();
        kv.set_with_ttl("a", "1", TTL, SetMode::IfAbsent)
            .await
            .unwrap();

        // when (操作):
        let written = kv
            .set_with_ttl("a", "2", TTL, SetMode::IfAbsent)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!written);
        assert_eq!(kv.get("a").await.unwrap(), Some("1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_keep_ttl_preserves_remaining_ttl() {
        // テスト項目: 値を置き換えても残りの TTL は延長されない
        // given (前提条件):
        let kv = InMemoryKeyValueStore::new();
        kv.set_with_ttl("a", "1", TTL, SetMode::Always).await.unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;

        // when (操作):
        let replaced = kv.replace_keep_ttl("a", "2").await.unwrap();

        // then (期待する結果):
        assert!(replaced);
        assert_eq!(
            kv.remaining_ttl("a").await.unwrap(),
            Some(Duration::from_secs(20))
        );
    }

    #[tokio::test]
    async fn test_replace_keep_ttl_does_not_create_missing_key() {
        // テスト項目: 存在しないキーの置き換えは何もしない
        // given (前提条件):
        let kv = InMemoryKeyValueStore::new();

        // when (操作):
        let replaced = kv.replace_keep_ttl("missing", "1").await.unwrap();

        // then (期待する結果):
        assert!(!replaced);
        assert_eq!(kv.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scan_prefix_reports_truncation() {
        // テスト項目: 上限を超えるキーがある場合、truncated が立つ
        // given (前提条件):
        let kv = InMemoryKeyValueStore::new();
        for i in 0..5 {
            kv.set_with_ttl(&format!("p:{i}"), "v", TTL, SetMode::Always)
                .await
                .unwrap();
        }
        kv.set_with_ttl("other", "v", TTL, SetMode::Always)
            .await
            .unwrap();

        // when (操作):
        let exact = kv.scan_prefix("p:", 5).await.unwrap();
        let short = kv.scan_prefix("p:", 4).await.unwrap();

        // then (期待する結果):
        assert_eq!(exact.keys.len(), 5);
        assert!(!exact.truncated);
        assert_eq!(short.keys.len(), 4);
        assert!(short.truncated);
    }
}
