//! # Document Store
//!
//! 컬렉션 하나에 대한 범용 문서 저장소 인터페이스입니다.
//! 서비스 계층은 이 트레이트만 알고, 실제 구현은 시작 시점에 주입됩니다.
//!
//! | 구현 | 용도 |
//! |------|------|
//! | [`MongoDocumentStore`](super::mongo_store::MongoDocumentStore) | 운영 (MongoDB) |
//! | [`InMemoryDocumentStore`](super::memory_store::InMemoryDocumentStore) | 테스트, `STORAGE_BACKEND=memory` |

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use crate::core::errors::AppResult;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn collection_name(&self) -> &str;

    /// 필터에 일치하는 모든 문서
    async fn find(&self, filter: Document) -> AppResult<Vec<Document>>;

    async fn find_one(&self, filter: Document) -> AppResult<Option<Document>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Document>> {
        self.find_one(doc! { "_id": *id }).await
    }

    /// ID 목록을 한 번의 쿼리로 조회합니다. 결과 순서는 보장하지 않습니다.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    /// 문서를 저장하고 `_id`가 채워진 문서를 돌려줍니다.
    async fn create(&self, fields: Document) -> AppResult<Document>;

    /// 여러 문서를 저장하고 입력 순서대로 새 ID를 돌려줍니다.
    async fn create_many(&self, docs: Vec<Document>) -> AppResult<Vec<ObjectId>>;

    /// `$set` 의미로 필드를 갱신하고 갱신된 문서를 돌려줍니다. 없으면 `None`.
    async fn update_by_id(&self, id: &ObjectId, fields: Document) -> AppResult<Option<Document>>;

    /// 삭제된 문서를 돌려줍니다. 없으면 `None`.
    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Document>>;

    /// 삭제된 문서 수
    async fn delete_many(&self, filter: Document) -> AppResult<u64>;
}
