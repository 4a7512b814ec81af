//! Users Entity Module
//!
//! 인증 주체(Principal)를 저장하는 `User` 엔티티를 정의합니다.
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! let user = User::new_local(
//!     "user@example.com".to_string(),
//!     "username".to_string(),
//!     "Display Name".to_string(),
//!     hashed_password,
//! );
//! ```

pub mod user;
