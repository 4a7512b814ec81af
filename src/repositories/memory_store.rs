//! 프로세스 메모리 기반 [`DocumentStore`] 구현
//!
//! 필터는 다음 형태만 지원합니다.
//!
//! - `{ "field": value }` - 값 일치. 필드가 배열이면 원소 포함 여부
//! - `{ "field": { "$in": [..] } }` - 목록 중 하나와 일치
//!
//! 빈 필터는 모든 문서와 일치합니다.

use std::sync::{Mutex, MutexGuard};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use crate::core::errors::{AppError, AppResult};
use super::document_store::DocumentStore;

pub struct InMemoryDocumentStore {
    name: String,
    documents: Mutex<Vec<Document>>,
}

impl InMemoryDocumentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<Document>>> {
        self.documents
            .lock()
            .map_err(|_| AppError::InternalError(format!("{} 저장소 잠금 실패", self.name)))
    }

    /// 저장된 문서 수
    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_id(mut doc: Document) -> (ObjectId, Document) {
        match doc.get_object_id("_id") {
            Ok(id) => (id, doc),
            Err(_) => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                (id, doc)
            }
        }
    }
}

fn value_matches(actual: Option<&Bson>, expected: &Bson) -> bool {
    match actual {
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => items.contains(expected),
        Some(value) => value == expected,
        None => matches!(expected, Bson::Null),
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(field, condition)| {
        let actual = doc.get(field);

        match condition {
            Bson::Document(op) if op.contains_key("$in") => match op.get("$in") {
                Some(Bson::Array(candidates)) => candidates.iter().any(|c| value_matches(actual, c)),
                _ => false,
            },
            expected => value_matches(actual, expected),
        }
    })
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: Document) -> AppResult<Vec<Document>> {
        let docs = self.lock()?;
        Ok(docs.iter().filter(|doc| matches_filter(doc, &filter)).cloned().collect())
    }

    async fn create(&self, fields: Document) -> AppResult<Document> {
        let (_, doc) = Self::with_id(fields);
        self.lock()?.push(doc.clone());
        Ok(doc)
    }

    async fn create_many(&self, docs: Vec<Document>) -> AppResult<Vec<ObjectId>> {
        let mut store = self.lock()?;
        let mut ids = Vec::with_capacity(docs.len());

        for doc in docs {
            let (id, doc) = Self::with_id(doc);
            store.push(doc);
            ids.push(id);
        }

        Ok(ids)
    }

    async fn update_by_id(&self, id: &ObjectId, fields: Document) -> AppResult<Option<Document>> {
        let mut store = self.lock()?;

        let Some(doc) = store.iter_mut().find(|doc| doc.get_object_id("_id").ok() == Some(*id)) else {
            return Ok(None);
        };

        for (key, value) in fields {
            if key != "_id" {
                doc.insert(key, value);
            }
        }

        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(&self, id: &ObjectId) -> AppResult<Option<Document>> {
        let mut store = self.lock()?;

        match store.iter().position(|doc| doc.get_object_id("_id").ok() == Some(*id)) {
            Some(index) => Ok(Some(store.remove(index))),
            None => Ok(None),
        }
    }

    async fn delete_many(&self, filter: Document) -> AppResult<u64> {
        let mut store = self.lock()?;
        let before = store.len();
        store.retain(|doc| !matches_filter(doc, &filter));
        Ok((before - store.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[actix_web::test]
    async fn test_create_assigns_ids_in_order() {
        let store = InMemoryDocumentStore::new("employments");

        let ids = store
            .create_many(vec![doc! { "title": "A" }, doc! { "title": "B" }])
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        let first = store.find_by_id(&ids[0]).await.unwrap().unwrap();
        assert_eq!(first.get_str("title").unwrap(), "A");
    }

    #[actix_web::test]
    async fn test_filter_equality_in_and_array_containment() {
        let store = InMemoryDocumentStore::new("users");
        store.create(doc! { "email": "a@x.com", "roles": ["talent"] }).await.unwrap();
        store.create(doc! { "email": "b@x.com", "roles": ["admin", "talent"] }).await.unwrap();
        store.create(doc! { "email": "c@x.com", "roles": ["admin"] }).await.unwrap();

        assert_eq!(store.find(doc! { "roles": "talent" }).await.unwrap().len(), 2);
        assert_eq!(store.find(doc! { "email": { "$in": ["a@x.com", "c@x.com"] } }).await.unwrap().len(), 2);
        assert_eq!(store.find(doc! {}).await.unwrap().len(), 3);
        assert!(store.find_one(doc! { "email": "z@x.com" }).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_update_sets_fields_and_keeps_id() {
        let store = InMemoryDocumentStore::new("companies");
        let created = store.create(doc! { "name": "Acme", "location": "Seoul" }).await.unwrap();
        let id = created.get_object_id("_id").unwrap();

        let updated = store
            .update_by_id(&id, doc! { "name": "Acme Corp", "_id": ObjectId::new() })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.get_object_id("_id").unwrap(), id);
        assert_eq!(updated.get_str("name").unwrap(), "Acme Corp");
        assert_eq!(updated.get_str("location").unwrap(), "Seoul");
        assert!(store.update_by_id(&ObjectId::new(), doc! { "x": 1 }).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_delete_by_id_and_many() {
        let store = InMemoryDocumentStore::new("answers");
        let q1 = ObjectId::new();
        let ids = store
            .create_many(vec![
                doc! { "question": q1 },
                doc! { "question": q1 },
                doc! { "question": ObjectId::new() },
            ])
            .await
            .unwrap();

        assert!(store.delete_by_id(&ids[2]).await.unwrap().is_some());
        assert!(store.delete_by_id(&ids[2]).await.unwrap().is_none());
        assert_eq!(store.delete_many(doc! { "question": { "$in": [q1] } }).await.unwrap(), 2);
        assert!(store.is_empty());
    }
}
