//! Repository trait 定義
//!
//! ドメイン層が必要とするストレージのインターフェースを定義します。
//! 具体的な実装（インメモリ / ネットワーク KV）は Infrastructure 層が提供します（依存性の逆転）。
//!
//! どちらの実装も同じ契約に従います：
//!
//! - 存在しない Questionnaire / Question への操作は NotFound 系のエラー
//! - 回答済みの質問への投票は `RepositoryError::QuestionAnswered`
//! - `get_questions` は投稿順に返す。列挙が上限を超える場合は部分的な結果を返さず
//!   `RepositoryError::CapacityExceeded`

use async_trait::async_trait;

use super::{Question, QuestionId, Questionnaire, QuestionnaireId, RepositoryError};

/// Questionnaire / Question を保持するストレージ
#[async_trait]
pub trait QuestionnaireRepository: Send + Sync {
    /// Questionnaire を保存（同じ ID が既に存在する場合はエラー）
    async fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError>;

    /// 質問を保存
    async fn save_question(
        &self,
        questionnaire_id: &QuestionnaireId,
        question: Question,
    ) -> Result<(), RepositoryError>;

    /// Questionnaire に属する質問を投稿順に取得
    async fn get_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Vec<Question>, RepositoryError>;

    /// Questionnaire を取得
    async fn get_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Questionnaire, RepositoryError>;

    /// 投票数を 1 増やし、新しい投票数を返す
    async fn vote(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<u16, RepositoryError>;

    /// 質問を回答済みにする（冪等）
    async fn answer(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<(), RepositoryError>;

    /// Questionnaire とその質問をすべて削除
    async fn delete_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<(), RepositoryError>;

    /// 保存されている Questionnaire の数
    async fn count_questionnaires(&self) -> Result<usize, RepositoryError>;

    /// Questionnaire に属する質問の数
    async fn count_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<usize, RepositoryError>;
}
