//! # Google OAuth 2.0 Service
//!
//! authorization code 흐름으로 Google 로그인을 처리합니다.
//!
//! 1. [`login_url`](GoogleAuthService::login_url) - state 토큰을 담은 동의 화면 URL 생성
//! 2. 콜백에서 [`authenticate_with_code`](GoogleAuthService::authenticate_with_code) 호출
//!    - state 검증 → code 교환 → userinfo 조회 → 사용자 조회/생성 → 토큰 쌍 발급
//!
//! state는 `OAUTH_STATE_SECRET`으로 서명한 짧은 수명의 HS256 토큰이라 서버에 저장하지 않습니다.
//! 같은 이메일의 로컬 계정이 이미 있으면 `ConflictError`입니다.

use std::sync::Arc;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use crate::config::{AuthProvider, GoogleOAuthConfig};
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::AuthResponse;
use crate::domain::entities::users::user::User;
use crate::domain::models::oauth::{GoogleTokenResponse, GoogleUserInfo, OAuthLoginUrlResponse, OAuthStateClaims};
use crate::repositories::users::UserRepository;
use super::token_service::TokenService;

pub struct GoogleAuthService {
    config: GoogleOAuthConfig,
    users: Arc<UserRepository>,
    tokens: Arc<TokenService>,
    http: reqwest::Client,
}

impl GoogleAuthService {
    pub fn new(config: GoogleOAuthConfig, users: Arc<UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { config, users, tokens, http: reqwest::Client::new() }
    }

    /// Google 동의 화면 URL
    pub fn login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
        let state = self.issue_state()?;

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("access_type", "online"),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(OAuthLoginUrlResponse {
            login_url: format!("{}?{}", self.config.auth_uri, query_string),
            state,
        })
    }

    fn issue_state(&self) -> AppResult<String> {
        let now = Utc::now();
        let claims = OAuthStateClaims {
            nonce: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.config.state_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.config.state_secret.as_bytes()))
            .map_err(|e| AppError::InternalError(format!("OAuth state 생성 실패: {}", e)))
    }

    fn verify_state(&self, state: &str) -> AppResult<()> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<OAuthStateClaims>(state, &DecodingKey::from_secret(self.config.state_secret.as_bytes()), &validation)
            .map(|_| ())
            .map_err(|e| {
                log::warn!("OAuth state 검증 실패: {}", e);
                AppError::AuthenticationError("유효하지 않은 OAuth state".to_string())
            })
    }

    /// 콜백 처리: Google 사용자로 로그인하거나 처음이면 가입시킵니다.
    pub async fn authenticate_with_code(&self, code: &str, state: &str) -> AppResult<AuthResponse> {
        self.verify_state(state)?;

        let token_response = self.exchange_code_for_token(code).await?;
        let google_user = self.get_user_info(&token_response.access_token).await?;

        let user = self.find_or_create(google_user).await?;
        let tokens = self.tokens.issue_token_pair(&user)?;

        Ok(AuthResponse::new(user, tokens))
    }

    async fn find_or_create(&self, google_user: GoogleUserInfo) -> AppResult<User> {
        match self.users.find_by_email(&google_user.email).await? {
            Some(existing) => match existing.auth_provider {
                AuthProvider::Google if existing.is_active() => {
                    log::info!("Google 사용자 로그인: {}", existing.email);
                    Ok(existing)
                }
                AuthProvider::Google => Err(AppError::AuthenticationError("비활성화된 계정입니다".to_string())),
                AuthProvider::Local => Err(AppError::ConflictError(
                    "이미 해당 이메일로 등록된 로컬 계정이 있습니다. 로컬 로그인을 사용해주세요.".to_string(),
                )),
            },
            None => {
                log::info!("새 Google 사용자 등록: {}", google_user.email);
                self.create_google_user(google_user).await
            }
        }
    }

    async fn exchange_code_for_token(&self, code: &str) -> AppResult<GoogleTokenResponse> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http
            .post(&self.config.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!("Google 토큰 교환 실패: {}", error_text)));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 응답 파싱 실패: {}", e)))
    }

    async fn get_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self.http
            .get(&self.config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!("Google 사용자 정보 조회 실패: {}", error_text)));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 사용자 정보 파싱 실패: {}", e)))
    }

    async fn create_google_user(&self, google_user: GoogleUserInfo) -> AppResult<User> {
        let base = username_base(&google_user);
        let username = self.generate_unique_username(&base).await?;
        let display_name = google_user.name.clone().unwrap_or_else(|| base.clone());

        let user = User::new_oauth(
            google_user.email,
            username,
            display_name,
            AuthProvider::Google,
            google_user.id,
            google_user.picture,
        );

        self.users.create(user).await
    }

    /// `base`, `base_1`, `base_2`, ... 순서로 비어 있는 사용자명을 찾습니다.
    async fn generate_unique_username(&self, base: &str) -> AppResult<String> {
        let mut username = base.to_string();
        let mut counter = 1;

        while self.users.find_by_username(&username).await?.is_some() {
            if counter > 1000 {
                return Err(AppError::InternalError("사용자명 생성 실패".to_string()));
            }
            username = format!("{}_{}", base, counter);
            counter += 1;
        }

        Ok(username)
    }
}

/// 사용자명 후보: 이름(없으면 이메일 앞부분)에서 영숫자와 `_`만 남깁니다.
fn username_base(google_user: &GoogleUserInfo) -> String {
    let source = google_user
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| google_user.email.split('@').next().unwrap_or_default());

    let cleaned: String = source
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .take(24)
        .collect();

    if cleaned.len() < 3 {
        format!("user_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::config::JwtConfig;
    use crate::repositories::memory_store::InMemoryDocumentStore;

    fn service(state_ttl: Duration) -> GoogleAuthService {
        let config = GoogleOAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:8080/api/v1/auth/google/callback".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "http://127.0.0.1:9/token".to_string(),
            userinfo_uri: "http://127.0.0.1:9/userinfo".to_string(),
            state_secret: "state-secret".to_string(),
            state_ttl,
        };
        let users = Arc::new(UserRepository::new(Arc::new(InMemoryDocumentStore::new("users")), None, 60));
        let tokens = Arc::new(TokenService::new(JwtConfig {
            secret: "secret".to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::days(30),
        }));

        GoogleAuthService::new(config, users, tokens)
    }

    fn google_user(email: &str, name: Option<&str>) -> GoogleUserInfo {
        GoogleUserInfo {
            id: "google-123".to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
            picture: None,
            verified_email: true,
        }
    }

    #[test]
    fn test_login_url_carries_verifiable_state() {
        let google = service(Duration::minutes(10));
        let response = google.login_url().unwrap();

        assert!(response.login_url.starts_with("https://accounts.google.com/o/oauth2/auth?client_id=client-id"));
        assert!(response.login_url.contains("scope=openid%20email%20profile"));
        assert!(response.login_url.contains(&format!("state={}", urlencoding::encode(&response.state))));
        assert!(google.verify_state(&response.state).is_ok());
    }

    #[test]
    fn test_expired_or_foreign_state_rejected() {
        let expired = service(Duration::seconds(-5));
        let state = expired.login_url().unwrap().state;
        assert!(expired.verify_state(&state).is_err());

        let google = service(Duration::minutes(10));
        assert!(google.verify_state("forged").is_err());
    }

    #[test]
    fn test_username_base() {
        assert_eq!(username_base(&google_user("a@b.com", Some("Hong Gil Dong"))), "hong_gil_dong");
        assert_eq!(username_base(&google_user("jane.doe@b.com", None)), "janedoe");
        assert_eq!(username_base(&google_user("x@b.com", Some("  "))), "user_x");
    }

    #[actix_web::test]
    async fn test_first_login_creates_talent_with_unique_username() {
        let google = service(Duration::minutes(10));
        google.users
            .create(User::new_local("other@b.com".to_string(), "kim".to_string(), "Kim".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let user = google.find_or_create(google_user("kim@gmail.com", Some("Kim"))).await.unwrap();
        assert_eq!(user.username, "kim_1");
        assert_eq!(user.auth_provider, AuthProvider::Google);
        assert!(user.password_hash.is_none());

        let again = google.find_or_create(google_user("kim@gmail.com", Some("Kim"))).await.unwrap();
        assert_eq!(again.id, user.id);
    }

    #[actix_web::test]
    async fn test_existing_local_account_conflicts() {
        let google = service(Duration::minutes(10));
        google.users
            .create(User::new_local("lee@gmail.com".to_string(), "lee".to_string(), "Lee".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let result = google.find_or_create(google_user("lee@gmail.com", Some("Lee"))).await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));
    }
}
