//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        answer_question, ask_question, create_questionnaire, delete_questionnaire,
        get_questionnaire, get_questions, health_check, vote_question, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// ルーティングを組み立てる
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/questionnaires", post(create_questionnaire))
        .route(
            "/questionnaires/{id}",
            get(get_questionnaire).delete(delete_questionnaire),
        )
        .route(
            "/questionnaires/{id}/questions",
            get(get_questions).post(ask_question),
        )
        .route(
            "/questionnaires/{id}/questions/{question_id}/vote",
            put(vote_question),
        )
        .route(
            "/questionnaires/{id}/questions/{question_id}/answer",
            put(answer_question),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Live Q&A server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(app_state));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// シグナルを受け取ると `AppState::shutdown` を発火し、WebSocket 接続を閉じてから終了する。
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let shutdown = self.state.shutdown.clone();
        let app = router(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Q&A server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => shutdown.cancel(),
                    _ = shutdown.cancelled() => {}
                }
            })
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
