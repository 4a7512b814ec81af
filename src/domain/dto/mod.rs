//! # Data Transfer Objects
//!
//! HTTP 경계에서 주고받는 요청/응답 타입입니다.
//! 요청 타입은 모두 `validator::Validate`를 구현하며 핸들러에서 `validate()?`로 검증합니다.

pub mod users;
pub mod catalog;
pub mod billing;
pub mod beta;

pub use users::*;
