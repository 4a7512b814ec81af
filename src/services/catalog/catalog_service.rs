//! # Catalog Service
//!
//! 회사, 학교, 강좌, 시험, 문항, 답안 레코드를 관리합니다.
//!
//! ```text
//! School ─< Course ─< Test ─< Question ─< Answer
//! Company
//! ```
//!
//! - 생성/수정 시 부모 ID가 실제로 존재해야 합니다. 없으면 `ReferenceNotFound([parent_id])`.
//! - 삭제는 자손까지 함께 지웁니다 (예: 시험 → 문항 → 답안).

use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use serde_json::Value;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::{EntityKind, Registry};
use crate::domain::dto::catalog::CatalogPayload;
use crate::utils::document::{document_to_json, parse_object_id};

#[derive(Clone)]
pub struct CatalogService {
    registry: Registry,
}

impl CatalogService {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    fn not_found(kind: EntityKind) -> AppError {
        AppError::NotFound(format!("{} 레코드를 찾을 수 없습니다", kind))
    }

    /// 페이로드를 검증하고 부모 참조를 `ObjectId`로 바꾼 저장용 문서를 만듭니다.
    async fn to_document<T: CatalogPayload>(&self, payload: &T) -> AppResult<Document> {
        payload.validate()?;

        let mut fields = bson::to_document(payload)?;

        if let (Some((parent_kind, field)), Some(raw)) = (T::KIND.parent(), payload.parent_id()) {
            let parent_id = ObjectId::parse_str(raw)
                .map_err(|_| AppError::ReferenceNotFound(vec![raw.to_string()]))?;

            if self.registry.store(parent_kind).find_by_id(&parent_id).await?.is_none() {
                return Err(AppError::ReferenceNotFound(vec![raw.to_string()]));
            }

            fields.insert(field, parent_id);
        }

        Ok(fields)
    }

    pub async fn create<T: CatalogPayload>(&self, created_by: &ObjectId, payload: T) -> AppResult<Value> {
        let mut fields = self.to_document(&payload).await?;

        let now = DateTime::now();
        fields.insert("created_by", *created_by);
        fields.insert("created_at", now);
        fields.insert("updated_at", now);

        let created = self.registry.store(T::KIND).create(fields).await?;
        log::info!("{} 생성: {:?} (by {})", T::KIND, created.get_object_id("_id").ok(), created_by);

        Ok(document_to_json(created))
    }

    pub async fn get(&self, kind: EntityKind, id: &str) -> AppResult<Value> {
        let id = parse_object_id(id)?;

        self.registry
            .store(kind)
            .find_by_id(&id)
            .await?
            .map(document_to_json)
            .ok_or_else(|| Self::not_found(kind))
    }

    /// 목록 조회. `parent`가 있으면 부모 필드로 거릅니다.
    pub async fn list(&self, kind: EntityKind, parent: Option<&str>) -> AppResult<Vec<Value>> {
        let filter = match (kind.parent(), parent) {
            (Some((_, field)), Some(raw)) => doc! { field: parse_object_id(raw)? },
            (None, Some(_)) => {
                return Err(AppError::ValidationError(format!("{}는 parent 필터를 지원하지 않습니다", kind)));
            }
            (_, None) => Document::new(),
        };

        let docs = self.registry.store(kind).find(filter).await?;
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    /// 보낸 필드만 `$set`으로 바꿉니다. 생략한 선택 필드는 기존 값을 유지합니다.
    pub async fn update<T: CatalogPayload>(&self, id: &str, payload: T) -> AppResult<Value> {
        let id = parse_object_id(id)?;
        let mut fields = self.to_document(&payload).await?;
        fields.insert("updated_at", DateTime::now());

        self.registry
            .store(T::KIND)
            .update_by_id(&id, fields)
            .await?
            .map(document_to_json)
            .ok_or_else(|| Self::not_found(T::KIND))
    }

    /// 레코드와 모든 자손을 삭제하고 삭제된 문서 수를 돌려줍니다.
    pub async fn delete(&self, kind: EntityKind, id: &str) -> AppResult<u64> {
        let id = parse_object_id(id)?;

        if self.registry.store(kind).delete_by_id(&id).await?.is_none() {
            return Err(Self::not_found(kind));
        }

        let mut removed = 1;
        let mut pending = vec![(kind, vec![id])];

        while let Some((parent_kind, parent_ids)) = pending.pop() {
            for (child_kind, field) in parent_kind.children() {
                let store = self.registry.store(child_kind);
                let filter = doc! { field: { "$in": parent_ids.clone() } };

                let child_ids: Vec<ObjectId> = store
                    .find(filter.clone())
                    .await?
                    .iter()
                    .filter_map(|doc| doc.get_object_id("_id").ok())
                    .collect();

                if child_ids.is_empty() {
                    continue;
                }

                removed += store.delete_many(filter).await?;
                pending.push((child_kind, child_ids));
            }
        }

        log::info!("{} 삭제: {} (연쇄 삭제 포함 {}건)", kind, id, removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dto::catalog::{
        AnswerPayload, CompanyPayload, CoursePayload, QuestionPayload, SchoolPayload, TestPayload,
    };

    fn id_of(value: &Value) -> String {
        value["id"].as_str().unwrap().to_string()
    }

    #[actix_web::test]
    async fn test_create_company_and_fetch() {
        let catalog = CatalogService::new(Registry::in_memory());
        let admin = ObjectId::new();

        let created = catalog
            .create(&admin, CompanyPayload {
                name: "Acme".to_string(),
                description: None,
                website: Some("https://acme.example.com".to_string()),
                industry: Some("Software".to_string()),
                location: None,
            })
            .await
            .unwrap();

        let fetched = catalog.get(EntityKind::Company, &id_of(&created)).await.unwrap();
        assert_eq!(fetched["name"], "Acme");
        assert_eq!(fetched["created_by"], admin.to_hex());
    }

    #[actix_web::test]
    async fn test_child_requires_existing_parent() {
        let catalog = CatalogService::new(Registry::in_memory());
        let missing = ObjectId::new().to_hex();

        let result = catalog
            .create(&ObjectId::new(), CoursePayload {
                school: missing.clone(),
                title: "Rust 101".to_string(),
                description: None,
                duration_weeks: None,
            })
            .await;

        match result {
            Err(AppError::ReferenceNotFound(ids)) => assert_eq!(ids, vec![missing]),
            other => panic!("expected ReferenceNotFound, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_delete_cascades_to_descendants() {
        let registry = Registry::in_memory();
        let catalog = CatalogService::new(registry.clone());
        let admin = ObjectId::new();

        let school = catalog
            .create(&admin, SchoolPayload { name: "KAIST".to_string(), description: None, website: None, location: None })
            .await
            .unwrap();
        let course = catalog
            .create(&admin, CoursePayload { school: id_of(&school), title: "Systems".to_string(), description: None, duration_weeks: Some(12) })
            .await
            .unwrap();
        let test = catalog
            .create(&admin, TestPayload { course: id_of(&course), title: "Midterm".to_string(), description: None, time_limit_minutes: Some(60), passing_score: Some(70) })
            .await
            .unwrap();

        for n in 0..2 {
            let question = catalog
                .create(&admin, QuestionPayload { test: id_of(&test), prompt: format!("Q{}", n), position: Some(n), points: Some(10) })
                .await
                .unwrap();
            catalog
                .create(&admin, AnswerPayload { question: id_of(&question), text: "42".to_string(), is_correct: true })
                .await
                .unwrap();
        }

        let listed = catalog.list(EntityKind::Question, Some(&id_of(&test))).await.unwrap();
        assert_eq!(listed.len(), 2);

        let removed = catalog.delete(EntityKind::Test, &id_of(&test)).await.unwrap();
        assert_eq!(removed, 5);
        assert!(registry.store(EntityKind::Question).find(doc! {}).await.unwrap().is_empty());
        assert!(registry.store(EntityKind::Answer).find(doc! {}).await.unwrap().is_empty());
        assert_eq!(registry.store(EntityKind::Course).find(doc! {}).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_update_and_missing_records() {
        let catalog = CatalogService::new(Registry::in_memory());
        let admin = ObjectId::new();
        let school = catalog
            .create(&admin, SchoolPayload { name: "Old".to_string(), description: None, website: None, location: None })
            .await
            .unwrap();

        let updated = catalog
            .update(&id_of(&school), SchoolPayload { name: "New".to_string(), description: None, website: None, location: Some("Daejeon".to_string()) })
            .await
            .unwrap();
        assert_eq!(updated["name"], "New");
        assert_eq!(updated["location"], "Daejeon");

        let renamed = catalog
            .update(&id_of(&school), SchoolPayload { name: "Newer".to_string(), description: None, website: None, location: None })
            .await
            .unwrap();
        assert_eq!(renamed["name"], "Newer");
        assert_eq!(renamed["location"], "Daejeon");

        let missing = ObjectId::new().to_hex();
        assert!(matches!(catalog.get(EntityKind::School, &missing).await, Err(AppError::NotFound(_))));
        assert!(matches!(catalog.delete(EntityKind::School, &missing).await, Err(AppError::NotFound(_))));
        assert!(matches!(catalog.list(EntityKind::Company, Some(&missing)).await, Err(AppError::ValidationError(_))));
    }
}
