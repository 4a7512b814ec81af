//! # Domain Layer
//!
//! 서비스의 도메인 타입을 정의합니다.
//!
//! ```text
//! domain/
//! ├── entities/   ← 영속 엔티티 (MongoDB 문서와 1:1)
//! ├── models/     ← 역할, 인증 컨텍스트, 토큰 클레임, 재조정 항목 같은 값 객체
//! └── dto/        ← HTTP 요청/응답 데이터 전송 객체
//! ```
//!
//! 카탈로그(회사, 학교, 강좌, 시험 등)와 경력/학력 하위 문서는 별도 엔티티 타입 없이
//! `bson::Document`로 저장되며, 입력 검증은 `dto` 계층에서 수행합니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::users::*;
