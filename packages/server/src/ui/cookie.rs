//! Cookie の読み取りと発行
//!
//! - `host`: ホストシークレット（Questionnaire 作成時に発行）
//! - `voter`: 投票者トークン（呼び出し側が発行する。サーバーは読むだけ）

use axum::http::{HeaderMap, header};

pub const HOST_COOKIE: &str = "host";
pub const VOTER_COOKIE: &str = "voter";

/// リクエストの `Cookie` ヘッダから `name` の値を取り出す
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// Cookie の発行設定
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// 有効期限（秒）。ストレージの TTL に合わせる
    pub max_age_secs: u64,
    /// `Secure` 属性を付けるか
    pub secure: bool,
}

impl CookieSettings {
    /// `Set-Cookie` ヘッダの値を作る
    pub fn build(&self, name: &str, value: &str) -> String {
        let mut cookie = format!(
            "{name}={value}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
            self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_read_cookie_among_many() {
        // テスト項目: 複数の Cookie から目的の値を取り出せる
        // given (前提条件):
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; voter=abc123; host=s3cret"),
        );

        // when (操作):
        let voter = read_cookie(&headers, VOTER_COOKIE);
        let host = read_cookie(&headers, HOST_COOKIE);
        let missing = read_cookie(&headers, "session");

        // then (期待する結果):
        assert_eq!(voter, Some("abc123"));
        assert_eq!(host, Some("s3cret"));
        assert_eq!(missing, None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        // テスト項目: 空の値は Cookie がないものとして扱う
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("voter="));

        assert_eq!(read_cookie(&headers, VOTER_COOKIE), None);
    }

    #[test]
    fn test_build_cookie_attributes() {
        // テスト項目: Secure 属性は設定に応じて付与される
        let insecure = CookieSettings {
            max_age_secs: 60,
            secure: false,
        };
        let secure = CookieSettings {
            max_age_secs: 60,
            secure: true,
        };

        assert_eq!(
            insecure.build("host", "x"),
            "host=x; Path=/; Max-Age=60; HttpOnly; SameSite=Strict"
        );
        assert!(secure.build("host", "x").ends_with("; Secure"));
    }
}
