//! UseCase: 質問の投稿
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AskQuestionUseCase::execute() メソッド
//! - 質問の保存と、Room への new_question イベントの配信
//!
//! ### なぜこのテストが必要か
//! - 投稿された質問が視聴者全員にリアルタイムで届くことを保証する
//! - Questionnaire ごとの質問数の上限で投稿が止まることを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：質問の保存と配信
//! - 異常系：存在しない Questionnaire、上限到達
//! - エッジケース：視聴者がいない Room（配信先なしでも成功）

use std::sync::Arc;

use ama_shared::time::Clock;

use crate::{
    domain::{
        ConnectionRegistry, Question, QuestionIdFactory, QuestionText, QuestionnaireId,
        QuestionnaireRepository, Timestamp,
    },
    infrastructure::dto::websocket::{NewQuestionDetails, RoomEvent},
};

use super::{
    admission::{AdmissionController, KeyedCounter},
    error::AskError,
    publish::publish,
};

/// 質問投稿のユースケース
pub struct AskQuestionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn QuestionnaireRepository>,
    /// ConnectionRegistry（Room への配信の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    /// 投稿時刻の取得元
    clock: Arc<dyn Clock>,
    /// Questionnaire ごとの質問数の上限
    admission: AdmissionController<dyn KeyedCounter>,
}

impl AskQuestionUseCase {
    /// 新しい AskQuestionUseCase を作成
    pub fn new(
        repository: Arc<dyn QuestionnaireRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        admission: AdmissionController<dyn KeyedCounter>,
    ) -> Self {
        Self {
            repository,
            registry,
            clock,
            admission,
        }
    }

    /// 質問を投稿し、Room の視聴者に new_question を配信する
    ///
    /// # Returns
    ///
    /// * `Ok(Question)` - 保存された質問（投票 0、未回答）
    /// * `Err(AskError)` - 上限到達、または Questionnaire が存在しない
    pub async fn execute(
        &self,
        questionnaire_id: QuestionnaireId,
        text: QuestionText,
    ) -> Result<Question, AskError> {
        let question = self
            .admission
            .admit_keyed(&questionnaire_id, || async {
                let question = Question::new(
                    QuestionIdFactory::generate()?,
                    questionnaire_id.clone(),
                    text,
                    Timestamp::new(self.clock.now_millis()),
                );
                self.repository
                    .save_question(&questionnaire_id, question.clone())
                    .await?;
                Ok::<_, AskError>(question)
            })
            .await?;

        tracing::info!(
            questionnaire = %questionnaire_id,
            question = %question.id,
            "Question asked"
        );

        let event = RoomEvent::NewQuestion(NewQuestionDetails::from(&question));
        publish(self.registry.as_ref(), &questionnaire_id, &event).await;

        Ok(question)
    }
}
