//! # Core Module
//!
//! 서비스 전역에서 공유하는 기반 타입입니다.
//!
//! - [`errors`] - 에러 타입과 HTTP 응답 매핑
//! - [`registry`] - 엔티티 종류별 문서 저장소 레지스트리
//! - [`state`] - 핸들러에 전달되는 애플리케이션 상태

pub mod errors;
pub mod registry;
pub mod state;

pub use errors::*;
pub use registry::{EntityKind, Registry};
pub use state::{AppSettings, AppState};
