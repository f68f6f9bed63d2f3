//! ID・シークレットの生成
//!
//! - `QuestionnaireIdFactory`: Unix 秒プレフィックス + 16 バイトの乱数（おおよそ時刻順に並ぶ）
//! - `QuestionIdFactory`: 16 バイトの乱数
//! - `HostSecretFactory`: 32 バイトの乱数
//!
//! 乱数は OS の乱数源から取得し、URL-safe・パディングなしの base64 でエンコードします。

use ama_shared::time::get_utc_unix_seconds;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

use super::{FactoryError, HostSecret, QuestionId, QuestionnaireId};

const QUESTIONNAIRE_ID_RANDOM_BYTES: usize = 16;
const QUESTION_ID_RANDOM_BYTES: usize = 16;
const HOST_SECRET_RANDOM_BYTES: usize = 32;

fn random_token(kind: &'static str, bytes: usize) -> Result<String, FactoryError> {
    let mut buffer = vec![0u8; bytes];
    OsRng.try_fill_bytes(&mut buffer).map_err(|e| FactoryError {
        kind,
        reason: e.to_string(),
    })?;
    Ok(URL_SAFE_NO_PAD.encode(buffer))
}

fn invalid(kind: &'static str, e: impl std::fmt::Display) -> FactoryError {
    FactoryError {
        kind,
        reason: e.to_string(),
    }
}

/// QuestionnaireId を生成する Factory
pub struct QuestionnaireIdFactory;

impl QuestionnaireIdFactory {
    pub fn generate() -> Result<QuestionnaireId, FactoryError> {
        let suffix = random_token("questionnaire id", QUESTIONNAIRE_ID_RANDOM_BYTES)?;
        QuestionnaireId::new(format!("{}{}", get_utc_unix_seconds(), suffix))
            .map_err(|e| invalid("questionnaire id", e))
    }
}

/// QuestionId を生成する Factory
pub struct QuestionIdFactory;

impl QuestionIdFactory {
    pub fn generate() -> Result<QuestionId, FactoryError> {
        let token = random_token("question id", QUESTION_ID_RANDOM_BYTES)?;
        QuestionId::new(token).map_err(|e| invalid("question id", e))
    }
}

/// HostSecret を生成する Factory
pub struct HostSecretFactory;

impl HostSecretFactory {
    pub fn generate() -> Result<HostSecret, FactoryError> {
        let token = random_token("host secret", HOST_SECRET_RANDOM_BYTES)?;
        HostSecret::new(token).map_err(|e| invalid("host secret", e))
    }
}
