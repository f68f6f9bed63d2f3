//! ConnectionRegistry trait 定義
//!
//! Room（Questionnaire ごとのライブ接続の集合）へのメッセージ配信を抽象化します。
//! Room は接続が 1 本以上ある間だけ存在し、最後の接続が抜けた時点で削除されます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{BroadcastError, ConnectionId, QuestionnaireId};

/// 接続ごとのメッセージ送信チャンネル
///
/// 受信側は接続のタスクが保持し、WebSocket へ書き出す。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Room に参加するライブ接続のハンドル
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub channel: PusherChannel,
}

impl Connection {
    pub fn new(id: ConnectionId, channel: PusherChannel) -> Self {
        Self { id, channel }
    }
}

/// Room とライブ接続の対応を管理するレジストリ
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続を Room に追加（Room がなければ作成）
    async fn join(&self, room: &QuestionnaireId, connection: Connection);

    /// 接続を Room から削除（Room や接続が存在しなければ何もしない）
    ///
    /// 最後の接続が抜けた Room は同じ操作の中で削除される。
    async fn leave(&self, room: &QuestionnaireId, connection_id: &ConnectionId);

    /// Room 内の全接続（送信者を含む）にメッセージを配信
    ///
    /// 配信できた接続数を返す。個々の接続への配信失敗はエラーにしない。
    async fn broadcast(&self, room: &QuestionnaireId, payload: &str)
    -> Result<usize, BroadcastError>;

    /// Room 内の接続数（Room が存在しなければ 0）
    async fn count_connections(&self, room: &QuestionnaireId) -> usize;
}
