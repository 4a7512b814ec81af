//! 도메인 엔티티
//!
//! MongoDB에 저장되는 타입이 지정된 엔티티입니다. 경력/학력, 카탈로그,
//! 결제 레코드 같은 나머지 컬렉션은 `DocumentStore`를 통해 BSON 문서로 다룹니다.

pub mod users;

pub use users::user::{User, UserStatus, OAuthData};
