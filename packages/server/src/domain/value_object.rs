//! Value Object 定義
//!
//! ドメイン層で使う不変の値。生成時にバリデーションを行い、以降は常に有効な値であることを保証します。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// タイトルの最大文字数
pub const TITLE_MAX_LENGTH: usize = 200;
/// 質問文の最大文字数
pub const QUESTION_TEXT_MAX_LENGTH: usize = 500;
/// 投票者トークンの最大長
pub const VOTER_TOKEN_MAX_LENGTH: usize = 128;
/// ID として許容する最大長
const ID_MAX_LENGTH: usize = 128;

/// 識別子として使える文字か（URL-safe base64 と数字のみ）
///
/// ストレージのキー区切り文字 `:` やキー照合のメタ文字を含まないことを保証する。
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn validate_id(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if value.len() > ID_MAX_LENGTH {
        return Err(ValueObjectError::TooLong {
            kind,
            max: ID_MAX_LENGTH,
        });
    }
    if !value.chars().all(is_id_char) {
        return Err(ValueObjectError::InvalidCharacters(kind));
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// 文字列から生成（バリデーション付き）
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                validate_id($kind, &value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Questionnaire の ID（時刻プレフィックス + ランダム部）
    QuestionnaireId,
    "questionnaire id"
);

string_id!(
    /// Question の ID（ランダムトークン）
    QuestionId,
    "question id"
);

/// ホストであることを証明する秘密トークン
///
/// `Debug` では値を出力しない（ログへの漏洩防止）。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostSecret(String);

impl HostSecret {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("host secret", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 提示された値がこのシークレットと一致するか
    ///
    /// 不一致の位置に依存しない比較を行う。
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for HostSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostSecret(***)")
    }
}

impl TryFrom<String> for HostSecret {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HostSecret> for String {
    fn from(value: HostSecret) -> Self {
        value.0
    }
}

/// 投票者を識別する不透明なトークン（呼び出し側が提供する未検証の値）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoterToken(String);

impl VoterToken {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("voter token"));
        }
        if value.len() > VOTER_TOKEN_MAX_LENGTH {
            return Err(ValueObjectError::TooLong {
                kind: "voter token",
                max: VOTER_TOKEN_MAX_LENGTH,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VoterToken {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 前後の空白を除去し、空文字と文字数上限をチェックする
fn validate_text(
    kind: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(kind));
    }
    if trimmed.chars().count() > max {
        return Err(ValueObjectError::TooLong { kind, max });
    }
    Ok(trimmed.to_string())
}

/// Questionnaire のタイトル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("title", value, TITLE_MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Title {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

/// 質問文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionText(String);

impl QuestionText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("question text", value, QUESTION_TEXT_MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for QuestionText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionText> for String {
    fn from(value: QuestionText) -> Self {
        value.0
    }
}

/// ライブ接続 1 本を識別する ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questionnaire_id_accepts_url_safe_characters() {
        // テスト項目: URL-safe な文字だけで構成された ID は受け入れられる
        // given (前提条件):
        let raw = "1700000000AbC-_09".to_string();

        // when (操作):
        let result = QuestionnaireId::new(raw.clone());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), raw);
    }

    #[test]
    fn test_questionnaire_id_rejects_key_separator() {
        // テスト項目: キー区切り文字やワイルドカードを含む ID は拒否される
        // given (前提条件):
        let inputs = ["abc:def", "abc*", "a?c", ""];

        for input in inputs {
            // when (操作):
            let result = QuestionnaireId::new(input.to_string());

            // then (期待する結果):
            assert!(result.is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_host_secret_matches() {
        // テスト項目: 提示された値が一致する場合のみ true を返す
        // given (前提条件):
        let secret = HostSecret::new("s3cr3t".to_string()).unwrap();

        // when / then:
        assert!(secret.matches("s3cr3t"));
        assert!(!secret.matches("s3cr3T"));
        assert!(!secret.matches("s3cr3t-longer"));
        assert!(!secret.matches(""));
    }

    #[test]
    fn test_host_secret_debug_is_redacted() {
        // テスト項目: Debug 出力にシークレットが含まれない
        // given (前提条件):
        let secret = HostSecret::new("topsecret".to_string()).unwrap();

        // when (操作):
        let debug = format!("{secret:?}");

        // then (期待する結果):
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn test_title_is_trimmed() {
        // テスト項目: タイトルの前後の空白が除去される
        // given (前提条件):
        let raw = "  Weekly AMA  ".to_string();

        // when (操作):
        let title = Title::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(title.as_str(), "Weekly AMA");
    }

    #[test]
    fn test_question_text_rejects_blank_and_too_long() {
        // テスト項目: 空白のみ・文字数超過の質問文は拒否される
        // given (前提条件):
        let blank = "   ".to_string();
        let too_long = "あ".repeat(QUESTION_TEXT_MAX_LENGTH + 1);

        // when / then:
        assert_eq!(
            QuestionText::new(blank),
            Err(ValueObjectError::Empty("question text"))
        );
        assert_eq!(
            QuestionText::new(too_long),
            Err(ValueObjectError::TooLong {
                kind: "question text",
                max: QUESTION_TEXT_MAX_LENGTH
            })
        );
    }

    #[test]
    fn test_question_text_counts_characters_not_bytes() {
        // テスト項目: 文字数上限はバイト数ではなく文字数で判定される
        // given (前提条件):
        let text = "質".repeat(QUESTION_TEXT_MAX_LENGTH);

        // when (操作):
        let result = QuestionText::new(text);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_voter_token_is_opaque() {
        // テスト項目: 投票者トークンは区切り文字などを含んでいても受け入れられる
        // given (前提条件):
        let raw = "voter:abc/def=".to_string();

        // when (操作):
        let token = VoterToken::new(raw.clone());

        // then (期待する結果):
        assert_eq!(token.unwrap().as_str(), raw);
        assert!(VoterToken::new(String::new()).is_err());
    }

    #[test]
    fn test_ids_roundtrip_through_serde() {
        // テスト項目: ID は JSON では素の文字列として表現され、不正な値はデシリアライズ時に拒否される
        // given (前提条件):
        let id = QuestionId::new("Q123".to_string()).unwrap();

        // when (操作):
        let json = serde_json::to_string(&id).unwrap();
        let invalid = serde_json::from_str::<QuestionId>("\"bad:id\"");

        // then (期待する結果):
        assert_eq!(json, "\"Q123\"");
        assert!(invalid.is_err());
    }
}
