//! 탤런트 허브 백엔드 메인 애플리케이션
//!
//! 설정을 읽고 저장소/캐시/결제 연동을 초기화한 뒤 `AppState`를 조립하여
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use talent_hub_backend::caching::redis::RedisClient;
use talent_hub_backend::caching::CacheStore;
use talent_hub_backend::config::{
    AuthGateConfig, CacheConfig, DatabaseConfig, GoogleOAuthConfig, JwtConfig, PasswordConfig,
    RateLimitConfig, ServerConfig, StorageBackend, StripeConfig,
};
use talent_hub_backend::core::{AppSettings, AppState, EntityKind, Registry};
use talent_hub_backend::db::Database;
use talent_hub_backend::middlewares::AuthGate;
use talent_hub_backend::repositories::{DocumentStore, MongoDocumentStore};
use talent_hub_backend::routes::configure_all_routes;
use talent_hub_backend::services::billing::{BillingProvider, StripeBilling};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 탤런트 허브 백엔드 시작중...");

    let registry = initialize_registry().await?;
    let cache = initialize_cache().await;
    let (billing, default_price_id) = initialize_billing();

    let google = GoogleOAuthConfig::from_env();
    if google.is_none() {
        warn!("Google OAuth 설정이 없어 소셜 로그인이 비활성화됩니다");
    }

    let gate = AuthGateConfig::from_env()
        .map_err(|e| io::Error::other(format!("AUTH_EXEMPT_PATHS 패턴 오류: {}", e)))?;

    let settings = AppSettings {
        jwt: JwtConfig::from_env(),
        gate,
        bcrypt_cost: PasswordConfig::bcrypt_cost(),
        user_cache_ttl: CacheConfig::from_env().user_ttl_seconds,
        google,
        default_price_id,
    };

    let state = web::Data::new(AppState::new(registry, cache, billing, settings));

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(state).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어는 바깥쪽부터 Rate Limit → CORS → Logger → NormalizePath → AuthGate 순서로 실행됩니다.
async fn start_http_server(state: web::Data<AppState>) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limit 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        let cors = configure_cors();

        App::new()
            .app_data(state.clone())
            // AuthGate가 가장 안쪽: 경로 정규화 이후에 예외 경로를 판단
            .wrap(AuthGate)
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .wrap(cors)
            // Rate Limiting 미들웨어 (가장 먼저 실행)
            .wrap(Governor::new(&governor_conf))
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .workers(4)
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG` 기본값: "info,actix_web=debug"
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 저장소 레지스트리를 초기화합니다
///
/// `STORAGE_BACKEND=memory`면 프로세스 메모리를, 아니면 MongoDB 컬렉션을 사용합니다.
/// MongoDB를 쓰면 `users.email`, `users.username` 유니크 인덱스를 보장합니다.
async fn initialize_registry() -> io::Result<Registry> {
    let config = DatabaseConfig::from_env();

    if config.backend == StorageBackend::Memory {
        warn!("⚠️ 메모리 저장소 사용: 재시작하면 데이터가 사라집니다");
        return Ok(Registry::in_memory());
    }

    info!("📡 데이터베이스 연결 중...");
    let database = Database::connect(&config)
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;

    info!("📦 문서 저장소: MongoDB ({})", database.database_name());

    let users = MongoDocumentStore::new(&database, EntityKind::User.collection_name());
    for field in ["email", "username"] {
        users
            .create_unique_index(field)
            .await
            .map_err(|e| io::Error::other(format!("users.{} 인덱스 생성 실패: {}", field, e)))?;
    }

    Ok(Registry::new(|kind| {
        Arc::new(MongoDocumentStore::new(&database, kind.collection_name())) as Arc<dyn DocumentStore>
    }))
}

/// Redis 캐시를 초기화합니다. 설정이 없거나 연결에 실패하면 캐시 없이 동작합니다.
async fn initialize_cache() -> Option<Arc<dyn CacheStore>> {
    let redis_url = CacheConfig::from_env().redis_url?;

    match RedisClient::connect(&redis_url).await {
        Ok(client) => Some(Arc::new(client) as Arc<dyn CacheStore>),
        Err(e) => {
            error!("Redis 연결 실패, 캐시 없이 계속합니다: {}", e);
            None
        }
    }
}

/// Stripe 결제 연동과 기본 가격 ID
fn initialize_billing() -> (Option<Arc<dyn BillingProvider>>, Option<String>) {
    match StripeConfig::from_env() {
        Some(config) => {
            info!("💳 Stripe 결제 활성화");
            let default_price_id = config.default_price_id.clone();
            (Some(Arc::new(StripeBilling::new(config)) as Arc<dyn BillingProvider>), default_price_id)
        }
        None => {
            warn!("STRIPE_SECRET_KEY가 없어 결제 기능이 비활성화됩니다");
            (None, None)
        }
    }
}

/// CORS 설정을 구성합니다
///
/// * `http://localhost:3000` - 프론트엔드 개발 서버
/// * `http://localhost:8080` - 자체 서버
/// * `127.0.0.1` 동등한 주소들
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_REQUEST_METHOD,
        ])
        // 자격 증명(리프레시 토큰 쿠키) 지원
        .supports_credentials()
        .max_age(3600)
}
