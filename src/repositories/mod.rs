//! 데이터 액세스 계층
//!
//! - [`document_store`] - 컬렉션 단위 문서 저장소 트레이트
//! - [`mongo_store`] / [`memory_store`] - 저장소 구현
//! - [`users`] - 캐시를 포함한 사용자 전용 리포지토리

pub mod document_store;
pub mod mongo_store;
pub mod memory_store;
pub mod users;

pub use document_store::DocumentStore;
pub use memory_store::InMemoryDocumentStore;
pub use mongo_store::MongoDocumentStore;
