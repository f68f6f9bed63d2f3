//! Redis による Key-Value ストア実装
//!
//! `MultiplexedConnection` は clone して並行に使える。操作ごとに clone する。
//! `SET ... KEEPTTL` を使うため Redis 6.0 以降が必要。

use std::{collections::BTreeSet, time::Duration};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};

use super::kv::{KeyValueError, KeyValueStore, ScanPage, SetMode};

/// 1 回の SCAN で要求する件数（ヒント）
const SCAN_BATCH: usize = 100;

/// Redis の Key-Value ストア
#[derive(Clone)]
pub struct RedisKeyValueStore {
    connection: MultiplexedConnection,
}

impl RedisKeyValueStore {
    /// Redis に接続する
    pub async fn connect(redis_url: &str) -> Result<Self, KeyValueError> {
        // URL は認証情報を含むことがあるのでログに出さない
        let client = Client::open(redis_url).map_err(|e| {
            tracing::error!(error = %e, "Failed to open Redis client");
            KeyValueError::Backend(format!("failed to open Redis client: {e}"))
        })?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to Redis");
                KeyValueError::Backend(format!("failed to connect to Redis: {e}"))
            })?;

        Ok(Self { connection })
    }
}

fn backend_error(op: &'static str) -> impl FnOnce(redis::RedisError) -> KeyValueError {
    move |e| {
        tracing::warn!(op, error = %e, "Redis command failed");
        KeyValueError::Backend(format!("{op} failed: {e}"))
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    // PX 0 は拒否されるので最低 1ms
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueError> {
        let mut conn = self.connection.clone();
        conn.get(key).await.map_err(backend_error("GET"))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
        mode: SetMode,
    ) -> Result<bool, KeyValueError> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("PX").arg(ttl_millis(ttl));
        if mode == SetMode::IfAbsent {
            cmd.arg("NX");
        }
        // NX で書き込まれなかった場合は nil が返る
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(backend_error("SET"))?;
        Ok(reply.is_some())
    }

    async fn replace_keep_ttl(&self, key: &str, value: &str) -> Result<bool, KeyValueError> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("XX")
            .arg("KEEPTTL")
            .query_async(&mut conn)
            .await
            .map_err(backend_error("SET XX"))?;
        Ok(reply.is_some())
    }

    async fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<ScanPage, KeyValueError> {
        let mut conn = self.connection.clone();
        let pattern = format!("{prefix}*");
        // SCAN は同じキーを複数回返すことがある
        let mut found = BTreeSet::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(backend_error("SCAN"))?;
            found.extend(batch);

            if found.len() > limit {
                let keys = found.into_iter().take(limit).collect();
                return Ok(ScanPage {
                    keys,
                    truncated: true,
                });
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(ScanPage {
            keys: found.into_iter().collect(),
            truncated: false,
        })
    }

    async fn delete(&self, keys: &[String]) -> Result<(), KeyValueError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection.clone();
        let _: i64 = conn.del(keys).await.map_err(backend_error("DEL"))?;
        Ok(())
    }

    async fn remaining_ttl(&self, key: &str) -> Result<Option<Duration>, KeyValueError> {
        let mut conn = self.connection.clone();
        // -2: キーなし、-1: TTL なし
        let millis: i64 = redis::cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(backend_error("PTTL"))?;
        Ok(u64::try_from(millis).ok().map(Duration::from_millis))
    }
}
