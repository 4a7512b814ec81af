//! 인증 서비스
//!
//! - [`token_service`] - JWT 발급/검증 (HS256)
//! - [`password`] - bcrypt 해싱, 리프레시 토큰용 비밀번호 다이제스트
//! - [`current_user`] - 요청 게이트의 사용자 확인 로직
//! - [`google_auth_service`] - Google OAuth 2.0 로그인

pub mod token_service;
pub mod password;
pub mod current_user;
pub mod google_auth_service;

pub use token_service::TokenService;
pub use password::{hash_password, password_digest, verify_password};
pub use current_user::{CurrentUserResolver, GateOutcome, GateRequest};
pub use google_auth_service::GoogleAuthService;
