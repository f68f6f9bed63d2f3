//! UseCase: 視聴者の接続
//!
//! Questionnaire が存在し、視聴者数が上限未満のときだけ Room に参加させます。
//! 参加の証として `RoomMembership` を返します。これは `DisconnectViewerUseCase` に
//! 渡して消費されるまで接続のタスクが保持します。

use std::sync::Arc;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, PusherChannel, QuestionnaireId,
    QuestionnaireRepository,
};

use super::{
    admission::{AdmissionController, KeyedCounter},
    error::ConnectError,
};

/// Room への参加を表すハンドル
///
/// `Clone` できないため、退出は 1 回だけ行われる。
#[derive(Debug)]
pub struct RoomMembership {
    room: QuestionnaireId,
    connection_id: ConnectionId,
}

impl RoomMembership {
    pub fn room(&self) -> &QuestionnaireId {
        &self.room
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub(crate) fn into_parts(self) -> (QuestionnaireId, ConnectionId) {
        (self.room, self.connection_id)
    }
}

/// 視聴者接続のユースケース
pub struct ConnectViewerUseCase {
    /// Repository（Questionnaire の存在確認）
    repository: Arc<dyn QuestionnaireRepository>,
    /// ConnectionRegistry（Room の参加者管理）
    registry: Arc<dyn ConnectionRegistry>,
    /// Room ごとの視聴者数の上限
    admission: AdmissionController<dyn KeyedCounter>,
}

impl ConnectViewerUseCase {
    /// 新しい ConnectViewerUseCase を作成
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        admission: AdmissionController<dyn KeyedCounter>,
    ) -> Self {
        Self {
            repository,
            registry,
            admission,
        }
    }

    /// 視聴者を Room に参加させる
    ///
    /// # Arguments
    ///
    /// * `questionnaire_id` - 参加する Room（Questionnaire）
    /// * `channel` - この接続へのメッセージ送信チャンネル
    pub async fn execute(
        &self,
        questionnaire_id: QuestionnaireId,
        channel: PusherChannel,
    ) -> Result<RoomMembership, ConnectError> {
        self.admission
            .admit_keyed(&questionnaire_id, || async {
                self.repository.get_questionnaire(&questionnaire_id).await?;

                let connection_id = ConnectionId::generate();
                self.registry
                    .join(&questionnaire_id, Connection::new(connection_id, channel))
                    .await;
                tracing::info!(
                    questionnaire = %questionnaire_id,
                    connection = %connection_id,
                    "Viewer connected"
                );
                Ok::<_, ConnectError>(RoomMembership {
                    room: questionnaire_id.clone(),
                    connection_id,
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RepositoryError,
        usecase::{admission::ViewerCount, test_support::Fixture},
    };
    use tokio::sync::mpsc;

    fn usecase(fixture: &Fixture, limit: usize) -> ConnectViewerUseCase {
        let counter: Arc<dyn KeyedCounter> = Arc::new(ViewerCount(fixture.registry.clone()));
        ConnectViewerUseCase::new(
            fixture.repository.clone(),
            fixture.registry.clone(),
            AdmissionController::new(counter, limit),
        )
    }

    #[tokio::test]
    async fn test_connect_joins_room() {
        // テスト項目: 接続した視聴者が Room に参加する
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let usecase = usecase(&fixture, 100);
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let membership = usecase.execute(qn.clone(), tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(membership.room(), &qn);
        assert_eq!(fixture.registry.count_connections(&qn).await, 1);
    }

    #[tokio::test]
    async fn test_connect_unknown_questionnaire() {
        // テスト項目: 存在しない Questionnaire には参加できず、Room も作られない
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = usecase(&fixture, 100);
        let unknown = QuestionnaireId::new("missing".to_string()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(unknown.clone(), tx).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ConnectError::Repository(
                RepositoryError::QuestionnaireNotFound(_)
            ))
        ));
        assert_eq!(fixture.registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_connect_rejected_at_viewer_limit() {
        // テスト項目: 視聴者数の上限に達すると参加が拒否される
        // given (前提条件):
        let fixture = Fixture::new();
        let qn = fixture.questionnaire("qn1").await;
        let usecase = usecase(&fixture, 1);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        usecase.execute(qn.clone(), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(qn.clone(), tx2).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ConnectError::Admission(_))));
        assert_eq!(fixture.registry.count_connections(&qn).await, 1);
    }
}
