//! Server configuration.
//!
//! Every flag can also be set through an `AMA_*` environment variable.

use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// プロセス内に保持する（再起動で消える）
    InMemory,
    /// Redis に TTL 付きで保存する
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("--redis-url is required when --storage=redis")]
    MissingRedisUrl,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ama-server")]
#[command(about = "Live Q&A server with real-time question and vote updates", long_about = None)]
pub struct Config {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "AMA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "AMA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "AMA_STORAGE", value_enum, default_value_t = StorageKind::InMemory)]
    pub storage: StorageKind,

    /// Redis connection URL (e.g. redis://localhost:6379)
    #[arg(long, env = "AMA_REDIS_URL")]
    pub redis_url: Option<String>,

    /// Lifetime of questionnaires and questions, in seconds
    #[arg(long, env = "AMA_TTL_SECS", default_value_t = 7200)]
    pub ttl_secs: u64,

    /// Lifetime of a vote ballot, in seconds (defaults to --ttl-secs)
    #[arg(long, env = "AMA_BALLOT_TTL_SECS")]
    pub ballot_ttl_secs: Option<u64>,

    /// Interval between sweeps of expired ballots, in seconds
    #[arg(long, env = "AMA_BALLOT_SWEEP_INTERVAL_SECS", default_value_t = 3)]
    pub ballot_sweep_interval_secs: u64,

    /// Maximum number of active questionnaires
    #[arg(long, env = "AMA_MAX_QUESTIONNAIRES", default_value_t = 20)]
    pub max_questionnaires: usize,

    /// Maximum number of questions per questionnaire
    #[arg(long, env = "AMA_MAX_QUESTIONS", default_value_t = 100)]
    pub max_questions: usize,

    /// Maximum number of simultaneous viewers per questionnaire
    #[arg(long, env = "AMA_MAX_VIEWERS", default_value_t = 100)]
    pub max_viewers: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "AMA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Mark issued cookies as Secure (HTTPS only)
    #[arg(long, env = "AMA_SECURE_COOKIES")]
    pub secure_cookies: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ttl-secs", self.ttl_secs),
            ("ballot-ttl-secs", self.ballot_ttl().as_secs()),
            ("ballot-sweep-interval-secs", self.ballot_sweep_interval_secs),
            ("max-questionnaires", self.max_questionnaires as u64),
            ("max-questions", self.max_questions as u64),
            ("max-viewers", self.max_viewers as u64),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(name));
        }
        if self.storage == StorageKind::Redis && self.redis_url.is_none() {
            return Err(ConfigError::MissingRedisUrl);
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn ballot_ttl(&self) -> Duration {
        Duration::from_secs(self.ballot_ttl_secs.unwrap_or(self.ttl_secs))
    }

    pub fn ballot_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.ballot_sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("ama-server").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしで既定値が使われる
        // given (前提条件):
        // when (操作):
        let config = parse(&[]);

        // then (期待する結果):
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageKind::InMemory);
        assert_eq!(config.ttl(), Duration::from_secs(7200));
        assert_eq!(config.ballot_ttl(), config.ttl());
        assert_eq!(config.ballot_sweep_interval(), Duration::from_secs(3));
        assert_eq!(
            (config.max_questionnaires, config.max_questions, config.max_viewers),
            (20, 100, 100)
        );
        assert!(!config.secure_cookies);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_ballot_ttl_override() {
        // テスト項目: Ballot の TTL を個別に指定できる
        let config = parse(&["--ttl-secs", "600", "--ballot-ttl-secs", "30"]);

        assert_eq!(config.ttl(), Duration::from_secs(600));
        assert_eq!(config.ballot_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        // テスト項目: 0 の TTL や上限は検証で拒否される
        assert_eq!(
            parse(&["--ttl-secs", "0"]).validate(),
            Err(ConfigError::Zero("ttl-secs"))
        );
        assert_eq!(
            parse(&["--max-viewers", "0"]).validate(),
            Err(ConfigError::Zero("max-viewers"))
        );
    }

    #[test]
    fn test_redis_requires_url() {
        // テスト項目: Redis を使う場合は URL が必須
        assert_eq!(
            parse(&["--storage", "redis"]).validate(),
            Err(ConfigError::MissingRedisUrl)
        );
        assert_eq!(
            parse(&["--storage", "redis", "--redis-url", "redis://localhost:6379"]).validate(),
            Ok(())
        );
    }
}
