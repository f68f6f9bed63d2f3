//! ネットワーク KV 型 Questionnaire Repository 実装
//!
//! Questionnaire と Question を個別のキーとして `KeyValueStore` に保存します。
//!
//! - 書き込み（作成）のたびに TTL を設定し直す
//! - 投票・回答による更新は残りの TTL を維持する（TTL を延長しない）
//! - 列挙は 1 ページ（`SCAN_PAGE_LIMIT` 件）まで。収まらない場合は `CapacityExceeded`
//!
//! KV には順序がないため、質問は `asked_at`（同時刻なら ID）で並べ直して返します。
//! このプロセス内の read-modify-write は `update_lock` で直列化されます。

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    kv::{KeyValueError, KeyValueStore, SetMode},
    record::{
        self, QUESTIONNAIRE_PREFIX, QuestionRecord, QuestionnaireRecord, question_key,
        question_prefix, questionnaire_key,
    },
};
use crate::domain::{
    Question, QuestionId, Questionnaire, QuestionnaireId, QuestionnaireRepository,
    RepositoryError,
};

/// 1 回の列挙で扱うキーの上限
pub const SCAN_PAGE_LIMIT: usize = 100;

impl From<KeyValueError> for RepositoryError {
    fn from(e: KeyValueError) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}

/// ネットワーク KV 型 Questionnaire Repository 実装
pub struct NetworkedQuestionnaireRepository {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    update_lock: Mutex<()>,
}

impl NetworkedQuestionnaireRepository {
    /// 新しい NetworkedQuestionnaireRepository を作成
    ///
    /// `ttl` は作成されたレコードの有効期限。
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            update_lock: Mutex::new(()),
        }
    }

    async fn ensure_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<(), RepositoryError> {
        match self.store.get(&questionnaire_key(questionnaire_id)).await? {
            Some(_) => Ok(()),
            None => Err(RepositoryError::QuestionnaireNotFound(
                questionnaire_id.clone(),
            )),
        }
    }

    /// 1 ページに収まるキーを列挙する
    async fn scan_page(
        &self,
        prefix: &str,
        what: &'static str,
    ) -> Result<Vec<String>, RepositoryError> {
        let page = self.store.scan_prefix(prefix, SCAN_PAGE_LIMIT).await?;
        if page.truncated {
            tracing::warn!(prefix, what, "Key enumeration exceeded one page");
            return Err(RepositoryError::CapacityExceeded {
                what,
                limit: SCAN_PAGE_LIMIT,
            });
        }
        Ok(page.keys)
    }

    /// 質問を読み出して `mutate` を適用し、残りの TTL を維持したまま書き戻す
    async fn update_question<F, T>(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
        mutate: F,
    ) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Question) -> Result<T, RepositoryError> + Send,
        T: Send,
    {
        let key = question_key(questionnaire_id, question_id);
        let _guard = self.update_lock.lock().await;

        // Questionnaire は質問キーより先に失効しうる
        self.ensure_questionnaire(questionnaire_id).await?;
        let Some(raw) = self.store.get(&key).await? else {
            return Err(RepositoryError::QuestionNotFound(question_id.clone()));
        };
        let mut question = record::decode_question(&key, &raw)?;
        let output = mutate(&mut question)?;

        let encoded = record::encode(&key, &QuestionRecord::from(&question))?;
        if !self.store.replace_keep_ttl(&key, &encoded).await? {
            // 読み出しから書き戻しまでの間に失効した
            return Err(RepositoryError::QuestionNotFound(question_id.clone()));
        }
        Ok(output)
    }
}

#[async_trait]
impl QuestionnaireRepository for NetworkedQuestionnaireRepository {
    async fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError> {
        let key = questionnaire_key(&questionnaire.id);
        let encoded = record::encode(&key, &QuestionnaireRecord::from(&questionnaire))?;
        let written = self
            .store
            .set_with_ttl(&key, &encoded, self.ttl, SetMode::IfAbsent)
            .await?;
        if !written {
            return Err(RepositoryError::AlreadyExists(questionnaire.id));
        }
        Ok(())
    }

    async fn save_question(
        &self,
        questionnaire_id: &QuestionnaireId,
        question: Question,
    ) -> Result<(), RepositoryError> {
        // 削除と直列化する（削除後に質問キーを残さない）
        let _guard = self.update_lock.lock().await;
        self.ensure_questionnaire(questionnaire_id).await?;
        let key = question_key(questionnaire_id, &question.id);
        let encoded = record::encode(&key, &QuestionRecord::from(&question))?;
        self.store
            .set_with_ttl(&key, &encoded, self.ttl, SetMode::Always)
            .await?;
        Ok(())
    }

    async fn get_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Vec<Question>, RepositoryError> {
        self.ensure_questionnaire(questionnaire_id).await?;
        let keys = self
            .scan_page(&question_prefix(questionnaire_id), "questions")
            .await?;

        let mut questions = Vec::with_capacity(keys.len());
        for key in keys {
            // 列挙から取得までの間に失効したキーは飛ばす
            if let Some(raw) = self.store.get(&key).await? {
                questions.push(record::decode_question(&key, &raw)?);
            }
        }
        questions.sort_by(|a, b| a.asked_at.cmp(&b.asked_at).then_with(|| a.id.cmp(&b.id)));
        Ok(questions)
    }

    async fn get_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Questionnaire, RepositoryError> {
        let key = questionnaire_key(questionnaire_id);
        match self.store.get(&key).await? {
            Some(raw) => record::decode_questionnaire(&key, &raw),
            None => Err(RepositoryError::QuestionnaireNotFound(
                questionnaire_id.clone(),
            )),
        }
    }

    async fn vote(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<u16, RepositoryError> {
        self.update_question(questionnaire_id, question_id, |question| {
            if !question.accepts_votes() {
                return Err(RepositoryError::QuestionAnswered(question.id.clone()));
            }
            Ok(question.add_vote())
        })
        .await
    }

    async fn answer(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<(), RepositoryError> {
        self.update_question(questionnaire_id, question_id, |question| {
            question.mark_answered();
            Ok(())
        })
        .await
    }

    async fn delete_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<(), RepositoryError> {
        let _guard = self.update_lock.lock().await;
        self.ensure_questionnaire(questionnaire_id).await?;

        // 先に Questionnaire を消し、以降の質問の追加を NotFound にする
        self.store
            .delete(&[questionnaire_key(questionnaire_id)])
            .await?;

        // 質問はページ単位で消していく
        let prefix = question_prefix(questionnaire_id);
        loop {
            let page = self.store.scan_prefix(&prefix, SCAN_PAGE_LIMIT).await?;
            self.store.delete(&page.keys).await?;
            if !page.truncated {
                break;
            }
        }
        tracing::debug!(questionnaire = %questionnaire_id, "Deleted questionnaire records");
        Ok(())
    }

    async fn count_questionnaires(&self) -> Result<usize, RepositoryError> {
        Ok(self
            .scan_page(QUESTIONNAIRE_PREFIX, "questionnaires")
            .await?
            .len())
    }

    async fn count_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<usize, RepositoryError> {
        if self
            .store
            .get(&questionnaire_key(questionnaire_id))
            .await?
            .is_none()
        {
            return Ok(0);
        }
        Ok(self
            .scan_page(&question_prefix(questionnaire_id), "questions")
            .await?
            .len())
    }
}
