//! UseCase: 視聴者の切断

use std::sync::Arc;

use crate::domain::ConnectionRegistry;

use super::connect_viewer::RoomMembership;

/// 視聴者切断のユースケース
pub struct DisconnectViewerUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectViewerUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Room から退出する。最後の視聴者だった場合は Room も削除される
    pub async fn execute(&self, membership: RoomMembership) {
        let (room, connection_id) = membership.into_parts();
        self.registry.leave(&room, &connection_id).await;
        tracing::info!(
            questionnaire = %room,
            connection = %connection_id,
            "Viewer disconnected"
        );
    }
}
