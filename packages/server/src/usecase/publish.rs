//! Room へのイベント配信
//!
//! 配信はストレージの更新が成功した後に行う。Room が存在しない（視聴者がいない）
//! 場合はイベントを捨てる。呼び出し元にはエラーを返さない。

use crate::{
    domain::{BroadcastError, ConnectionRegistry, QuestionnaireId},
    infrastructure::dto::websocket::RoomEvent,
};

pub(crate) async fn publish(
    registry: &dyn ConnectionRegistry,
    room: &QuestionnaireId,
    event: &RoomEvent,
) {
    let payload = match event.to_json() {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(room = %room, error = %e, "Failed to serialize room event");
            return;
        }
    };

    match registry.broadcast(room, &payload).await {
        Ok(delivered) => tracing::debug!(room = %room, delivered, "Published room event"),
        Err(BroadcastError::RoomNotFound(_)) => {
            tracing::debug!(room = %room, "No live viewers, room event dropped");
        }
    }
}
