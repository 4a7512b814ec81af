//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청을 역직렬화/검증하고 서비스를 호출한 뒤 응답을 만드는 일만 합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! HTTP Layer Architecture
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Mobile App, API Client)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   AuthGate / RequireRoles                       ← Middleware
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 공통 패턴
//!
//! ```rust,ignore
//! #[patch("")]
//! pub async fn edit_me(
//!     state: web::Data<AppState>,          // main에서 한 번 조립된 서비스 묶음
//!     ctx: AuthContext,                    // 인증 게이트가 붙인 현재 사용자
//!     payload: web::Json<EditProfileRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()?;
//!     let profile = state.users.edit_profile(&ctx, payload.into_inner()).await?;
//!     Ok(HttpResponse::Ok().json(profile))
//! }
//! ```
//!
//! - 입력 검증은 `validator`의 `Validate`로 하고 실패는 `AppError::ValidationError`(400)가 됩니다.
//! - 모든 에러는 `AppError`의 `ResponseError` 구현을 통해 `{ "error", "code" }` JSON으로 변환됩니다.
//!
//! ## 모듈 구성
//!
//! - [`auth`] - 가입, 로그인, 토큰 갱신, Google OAuth
//! - [`me`] - 현재 사용자 프로필 조회/편집, 비밀번호 변경
//! - [`users`] - 관리자 사용자 관리
//! - [`catalog`] - 회사/학교/강좌/시험/문항/답안 CRUD (제네릭)
//! - [`beta`] - 베타 신청
//! - [`billing`] - 구독 결제

pub mod auth;
pub mod me;
pub mod users;
pub mod catalog;
pub mod beta;
pub mod billing;
