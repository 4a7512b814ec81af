//! # Routes Module
//!
//! 모든 HTTP 라우트와 라우트별 역할 가드를 한곳에서 등록합니다.
//!
//! 인증 자체는 앱 전역의 [`AuthGate`](crate::middlewares::AuthGate)가 처리하고,
//! 여기서는 스코프/라우트 단위로 [`RequireRoles`]만 붙입니다.
//!
//! ## 라우트 구성
//!
//! | 경로 | 인증 | 역할 |
//! |------|------|------|
//! | `GET /health` | 예외 | - |
//! | `/api/v1/auth/*` | 예외 | - |
//! | `/api/v1/beta/*` | 예외 | - |
//! | `/api/v1/me` | 필요 | - |
//! | `/api/v1/users` | 필요 | admin (역할 재지정은 super_admin) |
//! | `/api/v1/companies` | 필요 | 쓰기: hr_admin, admin |
//! | `/api/v1/{schools,courses,tests,questions,answers}` | 필요 | 쓰기: school_admin, admin |
//! | `/api/v1/subscriptions` | 필요 | - (본인 구독만) |

use crate::domain::dto::catalog::{
    AnswerPayload, CatalogPayload, CompanyPayload, CoursePayload, QuestionPayload, SchoolPayload, TestPayload,
};
use crate::domain::models::auth::Role;
use crate::handlers;
use crate::middlewares::RequireRoles;
use actix_web::web;
use chrono;
use serde_json::json;

const COMPANY_WRITERS: [Role; 2] = [Role::HrAdmin, Role::Admin];
const SCHOOL_WRITERS: [Role; 2] = [Role::SchoolAdmin, Role::Admin];

/// 모든 라우트를 설정합니다
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new()
///     .app_data(state)
///     .wrap(AuthGate)
///     .configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_catalog_routes(cfg);
    configure_beta_routes(cfg);
    configure_billing_routes(cfg);
}

/// 인증 관련 라우트 (게이트 예외 경로)
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"Password123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            // 로컬 인증
            .service(handlers::auth::register)
            .service(handlers::auth::local_login)
            .service(handlers::auth::refresh_tokens)
            // Google OAuth
            .service(handlers::auth::google_login_url)
            .service(handlers::auth::google_oauth_callback)
    );
}

/// 사용자 라우트
///
/// - `/api/v1/me`: 인증된 누구나
/// - `/api/v1/users`: 관리자, 역할 재지정은 슈퍼 관리자 전용
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/me")
            .service(handlers::me::get_me)
            .service(handlers::me::edit_me)
            .service(handlers::me::change_password)
    );

    cfg.service(
        web::scope("/api/v1/users")
            .wrap(RequireRoles::any(&[Role::Admin]))
            .service(handlers::users::list_users)
            .service(handlers::users::set_user_status)
            .service(handlers::users::deactivate_user)
            .service(handlers::users::assign_roles)
    );
}

/// 카탈로그 라우트
///
/// 읽기는 인증된 누구나, 쓰기는 종류별 역할이 필요합니다.
fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog_scope::<CompanyPayload>("/api/v1/companies", &COMPANY_WRITERS));
    cfg.service(catalog_scope::<SchoolPayload>("/api/v1/schools", &SCHOOL_WRITERS));
    cfg.service(catalog_scope::<CoursePayload>("/api/v1/courses", &SCHOOL_WRITERS));
    cfg.service(catalog_scope::<TestPayload>("/api/v1/tests", &SCHOOL_WRITERS));
    cfg.service(catalog_scope::<QuestionPayload>("/api/v1/questions", &SCHOOL_WRITERS));
    cfg.service(catalog_scope::<AnswerPayload>("/api/v1/answers", &SCHOOL_WRITERS));
}

fn catalog_scope<T: CatalogPayload>(path: &str, writers: &[Role]) -> actix_web::Scope {
    use handlers::catalog;

    web::scope(path)
        .service(
            web::resource("")
                .route(web::get().to(catalog::list::<T>))
                .route(web::post().to(catalog::create::<T>).wrap(RequireRoles::any(writers)))
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(catalog::get::<T>))
                .route(web::put().to(catalog::update::<T>).wrap(RequireRoles::any(writers)))
                .route(web::delete().to(catalog::delete::<T>).wrap(RequireRoles::any(writers)))
        )
}

fn configure_beta_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/beta")
            .service(handlers::beta::sign_up)
    );
}

fn configure_billing_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subscriptions")
            .service(handlers::billing::create_subscription)
            .service(handlers::billing::list_subscriptions)
            .service(handlers::billing::cancel_subscription)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "talent_hub_backend",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use crate::core::state::testing::in_memory_state;
    use crate::middlewares::AuthGate;
    use super::*;

    #[actix_web::test]
    async fn test_health_is_public() {
        let state = web::Data::new(in_memory_state());
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_catalog_read_requires_authentication() {
        let state = web::Data::new(in_memory_state());
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/schools").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
