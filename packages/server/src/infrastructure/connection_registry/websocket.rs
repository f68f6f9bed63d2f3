//! WebSocket 接続の ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - Room ごとに接続中の `PusherChannel` を管理
//! - Room 内の全接続へのブロードキャスト
//!
//! ## 設計ノート
//!
//! WebSocket の受付とチャンネルの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! このレジストリは生成されたチャンネルを受け取り、配信にだけ使います。
//!
//! - すべての操作は 1 つの `Mutex` を取る
//! - 最後の接続が抜けた Room は `leave` の同じロック区間で削除する
//! - `broadcast` はロック中に送信先を複製し、ロックを解放してから送信する
//!
//! 空になって削除された Room への `broadcast` は `RoomNotFound` を返します（自動再作成はしない）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastError, Connection, ConnectionId, ConnectionRegistry, PusherChannel, QuestionnaireId,
};

/// WebSocket 接続の ConnectionRegistry 実装
///
/// ## フィールド
///
/// - `rooms`: Room ID → (接続 ID → 送信チャンネル)
#[derive(Debug, Default)]
pub struct WebSocketConnectionRegistry {
    rooms: Mutex<HashMap<QuestionnaireId, HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketConnectionRegistry {
    /// 新しい WebSocketConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在存在する Room の数
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn join(&self, room: &QuestionnaireId, connection: Connection) {
        let mut rooms = self.rooms.lock().await;
        let members = rooms.entry(room.clone()).or_default();
        members.insert(connection.id, connection.channel);
        tracing::debug!(
            room = %room,
            connection = %connection.id,
            viewers = members.len(),
            "Connection joined room"
        );
    }

    async fn leave(&self, room: &QuestionnaireId, connection_id: &ConnectionId) {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room) else {
            return;
        };
        members.remove(connection_id);
        let remaining = members.len();
        if remaining == 0 {
            rooms.remove(room);
            tracing::debug!(room = %room, "Last connection left, room removed");
        } else {
            tracing::debug!(
                room = %room,
                connection = %connection_id,
                viewers = remaining,
                "Connection left room"
            );
        }
    }

    async fn broadcast(
        &self,
        room: &QuestionnaireId,
        payload: &str,
    ) -> Result<usize, BroadcastError> {
        let targets: Vec<(ConnectionId, PusherChannel)> = {
            let rooms = self.rooms.lock().await;
            let members = rooms
                .get(room)
                .ok_or_else(|| BroadcastError::RoomNotFound(room.clone()))?;
            members
                .iter()
                .map(|(id, channel)| (*id, channel.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (id, channel) in targets {
            // 一部の接続への送信失敗は許容する
            if let Err(e) = channel.send(payload.to_string()) {
                tracing::warn!(
                    room = %room,
                    connection = %id,
                    error = %e,
                    "Failed to push message to connection"
                );
            } else {
                delivered += 1;
            }
        }
        tracing::debug!(room = %room, delivered, "Broadcasted message");
        Ok(delivered)
    }

    async fn count_connections(&self, room: &QuestionnaireId) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.get(room).map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - Room への参加・退出と、空になった Room の削除
    // - broadcast: Room 内の全接続への配信
    // - 切断済みの接続があっても他の接続への配信が続くこと
    //
    // 【なぜこのテストが必要か】
    // - ConnectionRegistry は UseCase から呼ばれる配信層の中核
    // - Room のライフサイクル（接続がある間だけ存在）を保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. join → leave で Room が消え、broadcast が RoomNotFound になる
    // 2. 2 接続への broadcast（送信者を含む全員が受け取る）
    // 3. 受信側が閉じた接続を含む broadcast
    // 4. 並行した join / leave の後に Room が残らない
    // ========================================

    fn room(id: &str) -> QuestionnaireId {
        QuestionnaireId::new(id.to_string()).unwrap()
    }

    fn connection() -> (Connection, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Connection::new(ConnectionId::generate(), tx), rx)
    }

    #[tokio::test]
    async fn test_room_vanishes_after_last_leave() {
        // テスト項目: 最後の接続が抜けると Room が削除される
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (c1, _rx1) = connection();
        let c1_id = c1.id;
        registry.join(&room("r1"), c1).await;

        // when (操作):
        registry.leave(&room("r1"), &c1_id).await;

        // then (期待する結果):
        assert_eq!(registry.count_connections(&room("r1")).await, 0);
        assert_eq!(
            registry.broadcast(&room("r1"), "hello").await,
            Err(BroadcastError::RoomNotFound(room("r1")))
        );
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection() {
        // テスト項目: Room 内の全接続が同じペイロードを受け取る
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (c1, mut rx1) = connection();
        let (c2, mut rx2) = connection();
        registry.join(&room("r1"), c1).await;
        registry.join(&room("r1"), c2).await;

        // when (操作):
        let delivered = registry.broadcast(&room("r1"), "payload").await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(2));
        assert_eq!(rx1.recv().await, Some("payload".to_string()));
        assert_eq!(rx2.recv().await, Some("payload".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_skips_dead_connection() {
        // テスト項目: 受信側が閉じた接続があっても他の接続に届き、エラーにならない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (dead, dead_rx) = connection();
        let (alive, mut alive_rx) = connection();
        registry.join(&room("r1"), dead).await;
        registry.join(&room("r1"), alive).await;
        drop(dead_rx);

        // when (操作):
        let delivered = registry.broadcast(&room("r1"), "payload").await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(1));
        assert_eq!(alive_rx.recv().await, Some("payload".to_string()));
    }

    #[tokio::test]
    async fn test_leave_unknown_room_is_noop() {
        // テスト項目: 存在しない Room・接続からの退出は何もしない
        // given (前提条件):
        let registry = WebSocketConnectionRegistry::new();
        let (c1, _rx1) = connection();
        registry.join(&room("r1"), c1).await;

        // when (操作):
        registry.leave(&room("r2"), &ConnectionId::generate()).await;
        registry.leave(&room("r1"), &ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(registry.count_connections(&room("r1")).await, 1);
        assert_eq!(registry.count_connections(&room("r2")).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_join_and_leave_leaves_no_room() {
        // テスト項目: 並行して join / leave しても、全員が抜けた後に Room が残らない
        // given (前提条件):
        let registry = Arc::new(WebSocketConnectionRegistry::new());
        let mut handles = Vec::new();

        // when (操作):
        for _ in 0..50 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let (c, _rx) = connection();
                let id = c.id;
                registry.join(&room("r1"), c).await;
                tokio::task::yield_now().await;
                registry.leave(&room("r1"), &id).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(registry.room_count().await, 0);
    }
}
