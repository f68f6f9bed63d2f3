//! InMemory Questionnaire Repository 実装
//!
//! ドメイン層が定義する `QuestionnaireRepository` trait の具体的な実装。
//! 1 つの `RwLock` で守られた HashMap をインメモリ DB として使用します。
//!
//! ## ロック規律
//!
//! - 変更系の操作はすべて write ロックを取る
//! - 読み取り系（存在チェックを含む）はすべて read ロックを取る
//!
//! 書きかけのレコードが読まれることはありません。プロセス再起動で内容は失われます。
//!
//! ## 有効期限
//!
//! `with_ttl` で作成した場合、Questionnaire は作成から TTL が経過すると質問ごと失効します。
//! 失効した Questionnaire は読み取りでは存在しない扱いになり、次の書き込み時に取り除かれます。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use tokio::{sync::RwLock, time::Instant};

use crate::domain::{
    Question, QuestionId, Questionnaire, QuestionnaireId, QuestionnaireRepository,
    RepositoryError,
};

/// 作成時に確保する質問リストの初期容量
const INITIAL_QUESTION_CAPACITY: usize = 10;

#[derive(Debug)]
struct Entry {
    questionnaire: Questionnaire,
    /// 投稿順
    questions: Vec<Question>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    fn question_mut(
        &mut self,
        question_id: &QuestionId,
    ) -> Result<&mut Question, RepositoryError> {
        self.questions
            .iter_mut()
            .find(|q| &q.id == question_id)
            .ok_or_else(|| RepositoryError::QuestionNotFound(question_id.clone()))
    }
}

#[derive(Debug, Default)]
struct Store {
    entries: HashMap<QuestionnaireId, Entry>,
}

impl Store {
    fn live(&self, questionnaire_id: &QuestionnaireId) -> Result<&Entry, RepositoryError> {
        self.entries
            .get(questionnaire_id)
            .filter(|entry| entry.is_live(Instant::now()))
            .ok_or_else(|| RepositoryError::QuestionnaireNotFound(questionnaire_id.clone()))
    }

    fn live_mut(
        &mut self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<&mut Entry, RepositoryError> {
        self.entries
            .get_mut(questionnaire_id)
            .filter(|entry| entry.is_live(Instant::now()))
            .ok_or_else(|| RepositoryError::QuestionnaireNotFound(questionnaire_id.clone()))
    }

    /// 失効した Questionnaire を取り除き、取り除いた数を返す
    fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before - self.entries.len()
    }
}

/// インメモリ Questionnaire Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryQuestionnaireRepository {
    store: RwLock<Store>,
    ttl: Option<Duration>,
}

impl InMemoryQuestionnaireRepository {
    /// 失効しない InMemoryQuestionnaireRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 作成から `ttl` で失効する InMemoryQuestionnaireRepository を作成
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: RwLock::default(),
            ttl: Some(ttl),
        }
    }
}

#[async_trait]
impl QuestionnaireRepository for InMemoryQuestionnaireRepository {
    async fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let purged = store.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Removed expired questionnaires");
        }
        if store.entries.contains_key(&questionnaire.id) {
            return Err(RepositoryError::AlreadyExists(questionnaire.id));
        }

        let id = questionnaire.id.clone();
        let entry = Entry {
            questionnaire,
            questions: Vec::with_capacity(INITIAL_QUESTION_CAPACITY),
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        };
        store.entries.insert(id, entry);
        Ok(())
    }

    async fn save_question(
        &self,
        questionnaire_id: &QuestionnaireId,
        question: Question,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store.live_mut(questionnaire_id)?.questions.push(question);
        Ok(())
    }

    async fn get_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Vec<Question>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.live(questionnaire_id)?.questions.clone())
    }

    async fn get_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<Questionnaire, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.live(questionnaire_id)?.questionnaire.clone())
    }

    async fn vote(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<u16, RepositoryError> {
        let mut store = self.store.write().await;
        let question = store.live_mut(questionnaire_id)?.question_mut(question_id)?;

        if !question.accepts_votes() {
            return Err(RepositoryError::QuestionAnswered(question_id.clone()));
        }
        Ok(question.add_vote())
    }

    async fn answer(
        &self,
        questionnaire_id: &QuestionnaireId,
        question_id: &QuestionId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store
            .live_mut(questionnaire_id)?
            .question_mut(question_id)?
            .mark_answered();
        Ok(())
    }

    async fn delete_questionnaire(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store.live(questionnaire_id)?;
        store.entries.remove(questionnaire_id);
        Ok(())
    }

    async fn count_questionnaires(&self) -> Result<usize, RepositoryError> {
        let store = self.store.read().await;
        let now = Instant::now();
        Ok(store
            .entries
            .values()
            .filter(|entry| entry.is_live(now))
            .count())
    }

    async fn count_questions(
        &self,
        questionnaire_id: &QuestionnaireId,
    ) -> Result<usize, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .live(questionnaire_id)
            .map_or(0, |entry| entry.questions.len()))
    }
}
