//! # Application State
//!
//! 프로세스 시작 시 한 번 조립되어 `web::Data<AppState>`로 모든 핸들러와 미들웨어에 공유됩니다.

use std::sync::Arc;
use crate::caching::CacheStore;
use crate::config::{AuthGateConfig, GoogleOAuthConfig, JwtConfig};
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{EntityKind, Registry};
use crate::repositories::users::UserRepository;
use crate::services::auth::{CurrentUserResolver, GoogleAuthService, TokenService};
use crate::services::beta::BetaSignupService;
use crate::services::billing::{BillingProvider, SubscriptionService};
use crate::services::catalog::CatalogService;
use crate::services::users::UserService;

/// 조립에 필요한 설정 묶음
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub jwt: JwtConfig,
    pub gate: AuthGateConfig,
    pub bcrypt_cost: u32,
    pub user_cache_ttl: u64,
    pub google: Option<GoogleOAuthConfig>,
    pub default_price_id: Option<String>,
}

pub struct AppState {
    pub registry: Registry,
    pub tokens: Arc<TokenService>,
    pub resolver: Arc<CurrentUserResolver>,
    pub users: Arc<UserService>,
    pub catalog: CatalogService,
    pub beta: BetaSignupService,
    billing: Option<SubscriptionService>,
    google: Option<GoogleAuthService>,
}

impl AppState {
    pub fn new(
        registry: Registry,
        cache: Option<Arc<dyn CacheStore>>,
        billing: Option<Arc<dyn BillingProvider>>,
        settings: AppSettings,
    ) -> Self {
        let user_repo = Arc::new(UserRepository::new(
            registry.store(EntityKind::User),
            cache,
            settings.user_cache_ttl,
        ));
        let tokens = Arc::new(TokenService::new(settings.jwt));

        let resolver = Arc::new(CurrentUserResolver::new(tokens.clone(), user_repo.clone(), settings.gate));
        let users = Arc::new(UserService::new(user_repo.clone(), tokens.clone(), registry.clone(), settings.bcrypt_cost));

        let billing = billing.map(|provider| {
            SubscriptionService::new(
                provider,
                user_repo.clone(),
                registry.store(EntityKind::Subscription),
                settings.default_price_id,
            )
        });
        let google = settings
            .google
            .map(|config| GoogleAuthService::new(config, user_repo.clone(), tokens.clone()));

        Self {
            catalog: CatalogService::new(registry.clone()),
            beta: BetaSignupService::new(registry.store(EntityKind::BetaSignup)),
            registry,
            tokens,
            resolver,
            users,
            billing,
            google,
        }
    }

    /// 결제 서비스. Stripe 설정이 없으면 `ExternalServiceError`.
    pub fn billing(&self) -> AppResult<&SubscriptionService> {
        self.billing
            .as_ref()
            .ok_or_else(|| AppError::ExternalServiceError("billing not configured".to_string()))
    }

    /// Google 로그인 서비스. 설정이 없으면 `ExternalServiceError`.
    pub fn google(&self) -> AppResult<&GoogleAuthService> {
        self.google
            .as_ref()
            .ok_or_else(|| AppError::ExternalServiceError("Google OAuth not configured".to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! HTTP 테스트용 상태 조립 도우미

    use super::*;
    use chrono::Duration;
    use crate::domain::entities::users::user::User;
    use crate::domain::models::auth::Role;

    pub fn settings() -> AppSettings {
        AppSettings {
            jwt: JwtConfig {
                secret: "http-test-secret".to_string(),
                access_ttl: Duration::minutes(15),
                refresh_ttl: Duration::days(30),
            },
            gate: AuthGateConfig::default(),
            bcrypt_cost: 4,
            user_cache_ttl: 60,
            google: None,
            default_price_id: None,
        }
    }

    pub fn in_memory_state() -> AppState {
        AppState::new(Registry::in_memory(), None, None, settings())
    }

    /// 역할을 지정한 사용자를 만들고 `Authorization` 헤더 값을 돌려줍니다.
    pub async fn seed_user(state: &AppState, username: &str, roles: &[Role]) -> (User, String) {
        let repo = UserRepository::new(state.registry.store(EntityKind::User), None, 60);

        let mut user = User::new_local(
            format!("{}@example.com", username),
            username.to_string(),
            username.to_string(),
            crate::services::auth::hash_password("Password123", 4).unwrap(),
        );
        user.roles = roles.to_vec();
        let user = repo.create(user).await.unwrap();

        let token = state
            .tokens
            .issue_access_token(&user.id_string().unwrap(), &user.roles, Duration::minutes(5))
            .unwrap();

        (user, format!("Bearer {}", token))
    }
}
