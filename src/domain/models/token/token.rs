//! JWT 클레임과 토큰 응답 모델

use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};
use crate::domain::models::auth::authentication_request::Role;

/// 액세스 토큰 클레임
///
/// 클레임 구성은 `{userId, roles, iat, exp}`로 고정입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub roles: Vec<Role>,
    pub iat: i64,
    pub exp: i64,
}

/// 리프레시 토큰 클레임
///
/// 서명 키가 `secret + password_digest`이므로 비밀번호가 바뀌면 검증에 실패합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
    /// 같은 초에 발급된 토큰도 서로 구분되도록 붙이는 고유 ID
    pub jti: String,
}

/// 디코딩된 토큰 (헤더, 페이로드, 서명)
#[derive(Debug, Clone)]
pub struct DecodedToken<C> {
    pub header: Header,
    pub claims: C,
    pub signature: String,
}

/// 토큰 쌍 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료까지 남은 초
    pub expires_in: i64,
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}
