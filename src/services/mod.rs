//! # Service Layer
//!
//! 비즈니스 로직 계층입니다. 각 서비스는 `main`에서 한 번 생성되어
//! [`AppState`](crate::core::state::AppState)에 담긴 채 핸들러로 전달됩니다.
//!
//! | 모듈 | 역할 |
//! |------|------|
//! | [`auth`] | 토큰, 비밀번호, 요청 게이트, Google 로그인 |
//! | [`profile`] | 경력/학력 하위 문서 재조정 |
//! | [`users`] | 가입, 로그인, 프로필 편집, 사용자 관리 |
//! | [`catalog`] | 회사/학교/강좌/시험/문항/답안 |
//! | [`billing`] | 구독 결제 |
//! | [`beta`] | 베타 신청 |

pub mod auth;
pub mod profile;
pub mod users;
pub mod catalog;
pub mod billing;
pub mod beta;
