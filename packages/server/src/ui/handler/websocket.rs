//! WebSocket connection handlers.
//!
//! 接続ごとに 2 つの処理が動く:
//! - pusher: Room から届いたメッセージを WebSocket に書き出すタスク
//! - 受信ループ: クライアントからのフレームを読み捨て、切断を検知する
//!
//! 受信ループは close フレーム・読み取りエラー・pusher の終了・サーバーのシャットダウンの
//! いずれかで終わり、どの場合も `RoomMembership` を 1 回だけ消費して Room から退出する。

use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::QuestionnaireId,
    ui::{error::ApiError, state::AppState},
    usecase::RoomMembership,
};

/// 正常な切断として扱う close コード（normal closure / going away / no status）
const EXPECTED_CLOSE_CODES: [u16; 3] = [1000, 1001, 1005];

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub questionnaire: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, ApiError> {
    let questionnaire_id = QuestionnaireId::new(query.questionnaire)?;

    // Room から届くメッセージのチャンネル
    let (tx, rx) = mpsc::unbounded_channel();
    let membership = state
        .connect_viewer_usecase
        .execute(questionnaire_id, tx)
        .await?;

    // アップグレードが失敗した場合もここで退出できるよう、両方のコールバックで共有する
    let slot = Arc::new(Mutex::new(Some(membership)));
    let slot_for_failure = slot.clone();
    let state_for_failure = state.clone();

    Ok(ws
        .on_failed_upgrade(move |e| {
            tracing::warn!(error = %e, "WebSocket upgrade failed");
            if let Some(membership) = take_membership(&slot_for_failure) {
                tokio::spawn(async move {
                    state_for_failure
                        .disconnect_viewer_usecase
                        .execute(membership)
                        .await;
                });
            }
        })
        .on_upgrade(move |socket| async move {
            if let Some(membership) = take_membership(&slot) {
                handle_socket(socket, state, membership, rx).await;
            }
        }))
}

fn take_membership(slot: &Mutex<Option<RoomMembership>>) -> Option<RoomMembership> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel closes or a write to the socket fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(msg.into())).await {
                tracing::debug!(error = %e, "Failed to write to WebSocket, stopping pusher");
                break;
            }
        }
    })
}

fn log_close(connection: impl std::fmt::Display, frame: Option<&CloseFrame>) {
    match frame {
        None => tracing::debug!(connection = %connection, "Client closed without status"),
        Some(frame) if EXPECTED_CLOSE_CODES.contains(&frame.code) => {
            tracing::debug!(connection = %connection, code = frame.code, "Client disconnected");
        }
        Some(frame) => tracing::warn!(
            connection = %connection,
            code = frame.code,
            reason = frame.reason.as_str(),
            "Client closed with unexpected status"
        ),
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    membership: RoomMembership,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let connection = membership.connection_id();
    let (sender, mut receiver) = socket.split();
    let mut pusher = pusher_loop(rx, sender);

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Close(frame))) => {
                    log_close(connection, frame.as_ref());
                    break;
                }
                // 視聴者からのメッセージは使わない（Ping/Pong はプロトコル層で処理される）
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(connection = %connection, error = %e, "Error reading WebSocket frame, disconnecting");
                    break;
                }
                None => {
                    tracing::debug!(connection = %connection, "WebSocket stream ended");
                    break;
                }
            },
            _ = &mut pusher => {
                tracing::debug!(connection = %connection, "Pusher stopped, disconnecting");
                break;
            }
            _ = state.shutdown.cancelled() => {
                tracing::debug!(connection = %connection, "Server shutting down, disconnecting");
                break;
            }
        }
    }

    pusher.abort();
    state.disconnect_viewer_usecase.execute(membership).await;
}
