//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 인증/인가 단계를 담당합니다.
//!
//! # 제공 미들웨어
//!
//! ### 1. 인증 게이트 (AuthGate)
//! - 모든 요청에 전역으로 적용
//! - 예외 경로는 그대로 통과
//! - Bearer 토큰을 검증하고 사용자 레코드를 조회해 [`AuthContext`](crate::domain::models::auth::AuthContext)를 붙임
//!
//! ### 2. 역할 가드 (RequireRoles)
//! - 스코프 또는 개별 라우트에 부착
//! - 게이트가 붙인 컨텍스트의 역할을 검사 (슈퍼 관리자는 항상 통과)
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(state.clone())
//!     .wrap(AuthGate)
//!     .service(
//!         web::scope("/api/v1/users")
//!             .wrap(RequireRoles::any(&[Role::Admin]))
//!             .route("", web::get().to(list_users))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::{AuthGate, RequireRoles};
