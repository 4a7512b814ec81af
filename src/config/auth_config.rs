//! # Authentication Configuration Module
//!
//! JWT 토큰, 인증 게이트(예외 경로), Google OAuth 관련 설정을 관리합니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ACCESS_EXPIRATION_MINUTES="15"
//! export JWT_REFRESH_EXPIRATION_DAYS="30"
//! ```
//!
//! ### Google OAuth 설정 (선택)
//! ```bash
//! export GOOGLE_CLIENT_ID="your-google-client-id"
//! export GOOGLE_CLIENT_SECRET="your-google-client-secret"
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/api/v1/auth/google/callback"
//! export OAUTH_STATE_SECRET="your-oauth-state-secret"
//! ```

use std::env;
use chrono::Duration;
use regex::Regex;
use super::{env_opt, env_or};

/// JWT 서명 설정
///
/// 액세스 토큰은 짧게(분 단위), 리프레시 토큰은 길게(일 단위) 유지합니다.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 프로세스 전역 서명 키
    pub secret: String,
    /// 액세스 토큰 유효 기간
    pub access_ttl: Duration,
    /// 리프레시 토큰 유효 기간
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    /// 환경 변수에서 JWT 설정을 로드합니다.
    ///
    /// `JWT_SECRET`이 없으면 개발용 기본 키를 사용하고 경고 로그를 남깁니다.
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        });

        Self {
            secret,
            access_ttl: Duration::minutes(env_or("JWT_ACCESS_EXPIRATION_MINUTES", 15)),
            refresh_ttl: Duration::days(env_or("JWT_REFRESH_EXPIRATION_DAYS", 30)),
        }
    }
}

/// 인증 게이트 설정
///
/// 예외 경로 패턴(정규식)에 일치하는 요청은 토큰 유무와 관계없이 게이트를 통과합니다.
#[derive(Debug, Clone)]
pub struct AuthGateConfig {
    exempt_paths: Vec<Regex>,
    /// Authorization 헤더가 없을 때 JSON 본문의 `token` 필드도 확인할지 여부
    pub token_in_body: bool,
}

impl AuthGateConfig {
    /// 기본 예외 경로: 헬스체크, 인증 엔드포인트, 베타 신청
    pub const DEFAULT_EXEMPT_PATHS: [&'static str; 3] = [
        r"^/health$",
        r"^/api/v1/auth(/.*)?$",
        r"^/api/v1/beta(/.*)?$",
    ];

    pub fn new<S: AsRef<str>>(patterns: &[S], token_in_body: bool) -> Result<Self, regex::Error> {
        let exempt_paths = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { exempt_paths, token_in_body })
    }

    /// `AUTH_EXEMPT_PATHS` (쉼표 구분), `AUTH_TOKEN_IN_BODY`
    pub fn from_env() -> Result<Self, regex::Error> {
        let token_in_body = env_or("AUTH_TOKEN_IN_BODY", false);

        match env_opt("AUTH_EXEMPT_PATHS") {
            Some(raw) => {
                let patterns: Vec<&str> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect();
                Self::new(&patterns, token_in_body)
            }
            None => Self::new(&Self::DEFAULT_EXEMPT_PATHS, token_in_body),
        }
    }

    /// 경로가 예외 목록에 포함되는지 확인
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|re| re.is_match(path))
    }
}

impl Default for AuthGateConfig {
    fn default() -> Self {
        let exempt_paths = Self::DEFAULT_EXEMPT_PATHS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();

        Self { exempt_paths, token_in_body: false }
    }
}

/// Google OAuth 2.0 설정
///
/// `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URI`가 모두 있어야 활성화됩니다.
/// `client_secret`은 절대 클라이언트 사이드에 노출되어서는 안 됩니다.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// 기본값: `https://accounts.google.com/o/oauth2/auth`
    pub auth_uri: String,
    /// 기본값: `https://oauth2.googleapis.com/token`
    pub token_uri: String,
    /// 기본값: `https://www.googleapis.com/oauth2/v2/userinfo`
    pub userinfo_uri: String,
    /// CSRF 방지용 state 토큰 서명 키
    pub state_secret: String,
    pub state_ttl: Duration,
}

impl GoogleOAuthConfig {
    pub fn from_env() -> Option<Self> {
        let client_id = env_opt("GOOGLE_CLIENT_ID")?;
        let client_secret = env_opt("GOOGLE_CLIENT_SECRET")?;
        let redirect_uri = env_opt("GOOGLE_REDIRECT_URI")?;

        let state_secret = env_opt("OAUTH_STATE_SECRET").unwrap_or_else(|| {
            log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
            "oauth-state-secret".to_string()
        });

        Some(Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_uri: env_opt("GOOGLE_AUTH_URI")
                .unwrap_or_else(|| "https://accounts.google.com/o/oauth2/auth".to_string()),
            token_uri: env_opt("GOOGLE_TOKEN_URI")
                .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string()),
            userinfo_uri: env_opt("GOOGLE_USERINFO_URI")
                .unwrap_or_else(|| "https://www.googleapis.com/oauth2/v2/userinfo".to_string()),
            state_secret,
            state_ttl: Duration::minutes(env_or("OAUTH_STATE_TTL_MINUTES", 10)),
        })
    }
}

/// 인증 프로바이더
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AuthProvider {
    /// 로컬 이메일/패스워드 인증
    Local,
    /// Google OAuth 2.0 인증
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exempt_paths() {
        let config = AuthGateConfig::default();

        assert!(config.is_exempt("/health"));
        assert!(config.is_exempt("/api/v1/auth/login"));
        assert!(config.is_exempt("/api/v1/auth"));
        assert!(config.is_exempt("/api/v1/beta/signup"));
        assert!(!config.is_exempt("/api/v1/me"));
        assert!(!config.is_exempt("/api/v1/authors"));
        assert!(!config.is_exempt("/healthz"));
    }

    #[test]
    fn test_custom_exempt_paths() {
        let config = AuthGateConfig::new(&[r"^/public/.*$"], true).unwrap();

        assert!(config.is_exempt("/public/docs"));
        assert!(!config.is_exempt("/health"));
        assert!(config.token_in_body);
    }

    #[test]
    fn test_invalid_exempt_pattern_is_rejected() {
        assert!(AuthGateConfig::new(&["(unclosed"], false).is_err());
    }

    #[test]
    fn test_auth_provider_serialization() {
        let json = serde_json::to_string(&AuthProvider::Google).unwrap();
        let deserialized: AuthProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, AuthProvider::Google);
        assert_eq!(AuthProvider::Local.as_str(), "local");
    }
}
