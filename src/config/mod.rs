//! # Configuration Module
//!
//! 서비스 설정을 환경 변수에서 읽어 구조체로 제공하는 모듈입니다.
//! `main`에서 한 번 로드한 값을 각 서비스 생성자에 명시적으로 넘깁니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 저장소, 캐시, Rate Limit 설정
//! - [`auth_config`] - JWT, 인증 게이트, Google OAuth 설정
//! - [`billing_config`] - Stripe 결제 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 저장소
//! export STORAGE_BACKEND="mongodb"      # mongodb | memory
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="talent_hub_dev"
//! export REDIS_URL="redis://localhost:6379"  # 없으면 캐시 비활성화
//!
//! # JWT
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_ACCESS_EXPIRATION_MINUTES="15"
//! export JWT_REFRESH_EXPIRATION_DAYS="30"
//!
//! # 인증 게이트
//! export AUTH_EXEMPT_PATHS="^/health$,^/api/v1/auth(/.*)?$"
//! export AUTH_TOKEN_IN_BODY="false"
//!
//! # Stripe (선택)
//! export STRIPE_SECRET_KEY="sk_test_..."
//! ```

pub mod data_config;
pub mod auth_config;
pub mod billing_config;

pub use data_config::*;
pub use auth_config::*;
pub use billing_config::*;

/// 환경 변수를 파싱하고, 없거나 파싱에 실패하면 기본값을 사용합니다.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::error!("{} 파싱 실패: {:?}. 기본값 사용", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// 비어 있지 않은 환경 변수 값을 반환합니다.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
