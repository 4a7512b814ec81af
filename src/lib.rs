//! 탤런트 허브 백엔드
//!
//! 인재 마켓플레이스를 위한 REST 백엔드입니다.
//! 계정과 인증, CV 형태의 프로필(경력·학력 하위 문서), 회사·학교·강좌·시험 카탈로그,
//! 베타 신청, 구독 결제를 제공합니다.
//!
//! # Features
//!
//! - **인증 게이트**: 모든 요청에서 Bearer 토큰을 검증하고 현재 사용자를 요청에 붙임 (예외 경로 지원)
//! - **역할 가드**: 스코프/라우트별 역할 검사, 슈퍼 관리자는 항상 통과
//! - **하위 문서 재조정**: 프로필의 경력/학력 목록에 create/update/delete 묶음을 검증 후 적용
//! - **JWT 인증**: 액세스/리프레시 토큰, 비밀번호 변경 시 리프레시 토큰 자동 무효화
//! - **OAuth 2.0**: Google 소셜 로그인
//! - **MongoDB**: 문서 저장 (로컬 실행/테스트용 메모리 저장소 포함)
//! - **Redis**: 사용자 조회 캐시 (선택)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + 역할 가드
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← DocumentStore 트레이트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use talent_hub_backend::core::{AppState, Registry};
//!
//! // 모든 서비스는 main에서 한 번 조립되어 핸들러에 공유됩니다.
//! let state = web::Data::new(AppState::new(Registry::in_memory(), None, None, settings));
//!
//! App::new()
//!     .app_data(state.clone())
//!     .wrap(AuthGate)
//!     .configure(configure_all_routes);
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
