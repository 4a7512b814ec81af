//! MongoDB 기반 [`DocumentStore`] 구현

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use super::document_store::DocumentStore;

/// 컬렉션 하나를 감싸는 저장소
#[derive(Clone)]
pub struct MongoDocumentStore {
    collection: Collection<Document>,
}

impl MongoDocumentStore {
    pub fn new(database: &Database, collection_name: &str) -> Self {
        Self {
            collection: database.get_database().collection::<Document>(collection_name),
        }
    }

    /// 단일 필드 유니크 인덱스 생성 (`{field}_unique`)
    pub async fn create_unique_index(&self, field: &str) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name(format!("{}_unique", field))
                .build())
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

fn db_err(e: mongodb::error::Error) -> AppError {
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn find(&self, filter: Document) -> AppResult<Vec<Document>> {
        let cursor = self.collection.find(filter).await.map_err(db_err)?;
        cursor.try_collect().await.map_err(db_err)
    }

    async fn find_one(&self, filter: Document) -> AppResult<Option<Document>> {
        self.collection.find_one(filter).await.map_err(db_err)
    }

    async fn create(&self, mut fields: Document) -> AppResult<Document> {
        let result = self.collection.insert_one(&fields).await.map_err(db_err)?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("insert_one이 ObjectId를 반환하지 않았습니다".to_string())
        })?;
        fields.insert("_id", id);

        Ok(fields)
    }

    async fn create_many(&self, docs: Vec<Document>) -> AppResult<Vec<ObjectId>> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        let count = docs.len();
        let result = self.collection.insert_many(docs).await.map_err(db_err)?;

        (0..count)
            .map(|index| match result.inserted_ids.get(&index) {
                Some(Bson::ObjectId(id)) => Ok(*id),
                _ => Err(AppError::InternalError(format!("insert_many 결과에 {}번째 ID가 없습니다", index))),
            })
            .collect()
    }

    async fn update_by_id(&self, id: &ObjectId, fields: Document) -> AppResult<Option<Document>> {
        if fields.is_empty() {
            return self.find_by_id(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": fields })
            .with_options(options)
            .await
            .map_err(db_err)
    }

    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Document>> {
        self.collection
            .find_one_and_delete(doc! { "_id": *id })
            .await
            .map_err(db_err)
    }

    async fn delete_many(&self, filter: Document) -> AppResult<u64> {
        let result = self.collection.delete_many(filter).await.map_err(db_err)?;
        Ok(result.deleted_count)
    }
}
