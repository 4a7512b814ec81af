//! # Domain Models
//!
//! 영속성과 무관한 값 객체 모음입니다.
//!
//! - [`auth`] - 역할, 주체(Principal), 요청별 인증 컨텍스트
//! - [`token`] - JWT 클레임과 토큰 쌍
//! - [`oauth`] - Google OAuth 응답과 state 클레임
//! - [`reconcile`] - 하위 문서 재조정 요청 항목

pub mod auth;
pub mod token;
pub mod oauth;
pub mod reconcile;
