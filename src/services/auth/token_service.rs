//! # Token Codec
//!
//! HS256 서명 JWT 발급과 검증을 담당합니다.
//!
//! - 액세스 토큰: `{userId, roles, iat, exp}`, 프로세스 전역 비밀 키로 서명
//! - 리프레시 토큰: `{userId, iat, exp, jti}`, `secret + password_digest`로 서명
//!
//! 비밀번호가 바뀌면 다이제스트가 바뀌므로 이전에 발급된 리프레시 토큰은
//! 별도의 폐기 목록 없이 모두 `InvalidToken`이 됩니다.
//!
//! ## 에러 매핑
//!
//! | jsonwebtoken | AuthError |
//! |--------------|-----------|
//! | `ExpiredSignature` | `ExpiredToken` |
//! | 그 외 전부 | `InvalidToken` |

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use crate::config::JwtConfig;
use crate::core::errors::{AppError, AppResult, AuthError};
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::authentication_request::Role;
use crate::domain::models::token::{AccessClaims, DecodedToken, RefreshClaims, TokenPair};
use super::password::password_digest;

fn sign<C: Serialize>(claims: &C, key: &[u8]) -> AppResult<String> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(key))
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

fn verify<C: DeserializeOwned>(token: &str, key: &[u8]) -> Result<DecodedToken<C>, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<C>(token, &DecodingKey::from_secret(key), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

    let signature = token.rsplit('.').next().unwrap_or_default().to_string();

    Ok(DecodedToken { header: data.header, claims: data.claims, signature })
}

fn refresh_key(secret: &str, digest: &str) -> Vec<u8> {
    format!("{}{}", secret, digest).into_bytes()
}

/// 액세스 토큰 발급
pub fn issue_access_token(secret: &str, user_id: &str, roles: &[Role], ttl: Duration) -> AppResult<String> {
    let now = Utc::now();
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        roles: roles.to_vec(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    sign(&claims, secret.as_bytes())
}

/// 리프레시 토큰 발급
pub fn issue_refresh_token(secret: &str, user_id: &str, digest: &str, ttl: Duration) -> AppResult<String> {
    let now = Utc::now();
    let claims = RefreshClaims {
        user_id: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &refresh_key(secret, digest))
}

/// 설정을 보관하고 토큰 함수들을 묶어 제공하는 서비스
#[derive(Debug, Clone)]
pub struct TokenService {
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn access_ttl(&self) -> Duration {
        self.config.access_ttl
    }

    pub fn issue_access_token(&self, user_id: &str, roles: &[Role], ttl: Duration) -> AppResult<String> {
        issue_access_token(&self.config.secret, user_id, roles, ttl)
    }

    pub fn issue_refresh_token(&self, user_id: &str, digest: &str, ttl: Duration) -> AppResult<String> {
        issue_refresh_token(&self.config.secret, user_id, digest, ttl)
    }

    /// 사용자 레코드로 액세스/리프레시 토큰 쌍을 발급합니다.
    pub fn issue_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        let user_id = user.id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let digest = password_digest(user.password_hash.as_deref());
        let access_token = self.issue_access_token(&user_id, &user.roles, self.config.access_ttl)?;
        let refresh_token = self.issue_refresh_token(&user_id, &digest, self.config.refresh_ttl)?;

        Ok(TokenPair::bearer(access_token, refresh_token, self.config.access_ttl.num_seconds()))
    }

    /// 액세스 토큰 검증 및 디코딩
    pub fn decode(&self, token: &str) -> Result<DecodedToken<AccessClaims>, AuthError> {
        verify(token, self.config.secret.as_bytes())
    }

    /// 현재 비밀번호 다이제스트로 리프레시 토큰 검증
    pub fn verify_refresh_token(&self, token: &str, digest: &str) -> Result<RefreshClaims, AuthError> {
        verify::<RefreshClaims>(token, &refresh_key(&self.config.secret, digest)).map(|d| d.claims)
    }

    /// 서명 검증 없이 리프레시 토큰의 사용자 ID만 읽습니다.
    ///
    /// 검증 키에 사용자의 비밀번호 다이제스트가 필요하므로, 먼저 사용자를 찾는 데만 씁니다.
    /// 반환값을 신뢰하기 전에 반드시 [`verify_refresh_token`](Self::verify_refresh_token)을 거쳐야 합니다.
    pub fn peek_refresh_subject(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<RefreshClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.user_id)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// `Authorization` 헤더 값에서 Bearer 토큰 추출
    pub fn extract_bearer_token(auth_header: &str) -> Result<&str, AuthError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "64b7f0c2a1b2c3d4e5f60718";

    fn service() -> TokenService {
        TokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(30),
        })
    }

    #[test]
    fn test_access_token_roundtrip() {
        let tokens = service();
        let token = tokens.issue_access_token(USER_ID, &[Role::Talent, Role::HrAdmin], Duration::minutes(5)).unwrap();

        let decoded = tokens.decode(&token).unwrap();
        assert_eq!(decoded.claims.user_id, USER_ID);
        assert_eq!(decoded.claims.roles, vec![Role::Talent, Role::HrAdmin]);
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 300);
        assert_eq!(decoded.header.alg, Algorithm::HS256);
        assert!(!decoded.signature.is_empty());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let tokens = service();
        let token = tokens.issue_access_token(USER_ID, &[Role::Talent], Duration::seconds(-30)).unwrap();

        assert_eq!(tokens.decode(&token).unwrap_err(), AuthError::ExpiredToken);
    }

    #[test]
    fn test_tampered_or_foreign_token_is_invalid() {
        let tokens = service();
        let foreign = issue_access_token("other-secret", USER_ID, &[Role::SuperAdmin], Duration::minutes(5)).unwrap();

        assert_eq!(tokens.decode(&foreign).unwrap_err(), AuthError::InvalidToken);
        assert_eq!(tokens.decode("not.a.jwt").unwrap_err(), AuthError::InvalidToken);
        assert_eq!(tokens.decode("").unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_password_change_invalidates_refresh_token() {
        let tokens = service();
        let d1 = password_digest(Some("$2b$04$first"));
        let d2 = password_digest(Some("$2b$04$second"));

        let refresh = tokens.issue_refresh_token(USER_ID, &d1, Duration::days(1)).unwrap();

        assert_eq!(tokens.verify_refresh_token(&refresh, &d1).unwrap().user_id, USER_ID);
        assert_eq!(tokens.verify_refresh_token(&refresh, &d2).unwrap_err(), AuthError::InvalidToken);
        assert_eq!(tokens.peek_refresh_subject(&refresh).unwrap(), USER_ID);
    }

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let tokens = service();
        let digest = password_digest(None);
        let access = tokens.issue_access_token(USER_ID, &[Role::Talent], Duration::minutes(5)).unwrap();

        assert!(tokens.verify_refresh_token(&access, &digest).is_err());
        assert!(tokens.peek_refresh_subject(&access).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(TokenService::extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert_eq!(TokenService::extract_bearer_token("Basic abc").unwrap_err(), AuthError::InvalidToken);
        assert_eq!(TokenService::extract_bearer_token("Bearer ").unwrap_err(), AuthError::InvalidToken);
    }
}
