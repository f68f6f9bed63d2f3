//! Live Q&A server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ama-server
//! cargo run --bin ama-server -- --host 0.0.0.0 --port 3000
//! cargo run --bin ama-server -- --storage redis --redis-url redis://localhost:6379
//! ```

use std::sync::Arc;

use ama_server::{
    config::{Config, StorageKind},
    domain::QuestionnaireRepository,
    infrastructure::{
        connection_registry::WebSocketConnectionRegistry,
        repository::{
            InMemoryQuestionnaireRepository, NetworkedQuestionnaireRepository, RedisKeyValueStore,
        },
        vote_ledger::{InMemoryVoteLedger, run_ballot_sweeper},
    },
    ui::{
        Server,
        cookie::CookieSettings,
        state::{AdmissionLimits, AppState},
    },
};
use ama_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Initialize dependencies in order:
    // 1. Repository
    // 2. ConnectionRegistry
    // 3. VoteLedger (+ sweeper task)
    // 4. AppState (UseCases)
    // 5. Server

    // 1. Create Repository
    let repository: Arc<dyn QuestionnaireRepository> = match config.storage {
        StorageKind::InMemory => {
            tracing::info!(ttl_secs = config.ttl_secs, "Using in-memory storage");
            Arc::new(InMemoryQuestionnaireRepository::with_ttl(config.ttl()))
        }
        StorageKind::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            let store = RedisKeyValueStore::connect(url).await?;
            tracing::info!(ttl_secs = config.ttl_secs, "Using Redis storage");
            Arc::new(NetworkedQuestionnaireRepository::new(
                Arc::new(store),
                config.ttl(),
            ))
        }
    };

    // 2. Create ConnectionRegistry (WebSocket implementation)
    let registry = Arc::new(WebSocketConnectionRegistry::new());

    // 3. Create VoteLedger and start sweeping expired ballots
    let shutdown = CancellationToken::new();
    let ledger = Arc::new(InMemoryVoteLedger::new(config.ballot_ttl()));
    let sweeper = tokio::spawn(run_ballot_sweeper(
        ledger.clone(),
        config.ballot_sweep_interval(),
        shutdown.clone(),
    ));

    // 4. Create AppState
    let state = AppState::new(
        repository,
        registry,
        ledger,
        Arc::new(SystemClock),
        AdmissionLimits {
            questionnaires: config.max_questionnaires,
            questions: config.max_questions,
            viewers: config.max_viewers,
        },
        CookieSettings {
            max_age_secs: config.ttl_secs,
            secure: config.secure_cookies,
        },
        shutdown.clone(),
    );

    // 5. Create and run the server
    let result = Server::new(Arc::new(state)).run(config.host, config.port).await;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!("Ballot sweeper ended abnormally: {}", e);
    }
    result
}
