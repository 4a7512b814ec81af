//! # 사용자 리포지토리
//!
//! `users` 컬렉션 위의 타입 있는 접근 계층입니다.
//! 인증 게이트는 요청마다 사용자를 조회하므로 ID 조회 결과를 캐시에 둡니다.
//!
//! ## 캐싱 전략
//!
//! - **키 패턴**: `user:{user_id}`
//! - **TTL**: `USER_CACHE_TTL_SECONDS` (기본 600초)
//! - **무효화**: `update` 성공 시 즉시 삭제
//!
//! 캐시 오류는 조회를 실패시키지 않고 경고 로그만 남깁니다.

use std::sync::Arc;
use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use crate::caching::{self, CacheStore};
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::User;
use crate::repositories::document_store::DocumentStore;

pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: u64,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Option<Arc<dyn CacheStore>>, cache_ttl: u64) -> Self {
        Self { store, cache, cache_ttl }
    }

    fn cache_key(id: &ObjectId) -> String {
        format!("user:{}", id.to_hex())
    }

    async fn invalidate_cache(&self, id: &ObjectId) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(&Self::cache_key(id)).await {
                log::warn!("사용자 캐시 무효화 실패 ({}): {}", id, e);
            }
        }
    }

    fn to_user(doc: Option<Document>) -> AppResult<Option<User>> {
        doc.map(bson::from_document::<User>).transpose().map_err(AppError::from)
    }

    /// 문자열 ID로 조회. 형식이 잘못되면 `ValidationError`.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        self.find_by_object_id(&object_id).await
    }

    /// ID로 조회 (캐시 우선)
    pub async fn find_by_object_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        let cache_key = Self::cache_key(id);

        if let Some(cache) = &self.cache {
            match caching::get_json::<User>(cache.as_ref(), &cache_key).await {
                Ok(Some(user)) => return Ok(Some(user)),
                Ok(None) => {}
                Err(e) => log::warn!("사용자 캐시 조회 실패 ({}): {}", cache_key, e),
            }
        }

        let user = Self::to_user(self.store.find_by_id(id).await?)?;

        if let (Some(cache), Some(user)) = (&self.cache, &user) {
            if let Err(e) = caching::set_json(cache.as_ref(), &cache_key, user, self.cache_ttl).await {
                log::warn!("사용자 캐시 저장 실패 ({}): {}", cache_key, e);
            }
        }

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Self::to_user(self.store.find_one(doc! { "email": email.to_lowercase() }).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Self::to_user(self.store.find_one(doc! { "username": username }).await?)
    }

    /// 새 사용자 저장. 이메일/사용자명 중복이면 `ConflictError`.
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        user.email = user.email.to_lowercase();

        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        let created = self.store.create(bson::to_document(&user)?).await?;
        user.id = Some(created.get_object_id("_id")
            .map_err(|e| AppError::InternalError(format!("생성된 사용자 ID 없음: {}", e)))?);

        Ok(user)
    }

    /// `$set` 갱신. `updated_at`은 항상 현재 시각으로 설정됩니다.
    pub async fn update(&self, id: &ObjectId, mut fields: Document) -> AppResult<Option<User>> {
        fields.insert("updated_at", DateTime::now());

        let updated = Self::to_user(self.store.update_by_id(id, fields).await?)?;

        if updated.is_some() {
            self.invalidate_cache(id).await;
        }

        Ok(updated)
    }

    pub async fn list(&self, filter: Document) -> AppResult<Vec<User>> {
        self.store
            .find(filter)
            .await?
            .into_iter()
            .map(|doc| bson::from_document::<User>(doc).map_err(AppError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::repositories::memory_store::InMemoryDocumentStore;

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl CacheStore for MapCache {
        async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set_raw(&self, key: &str, value: String, _ttl_seconds: u64) -> AppResult<()> {
            self.entries.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn sample(email: &str, username: &str) -> User {
        User::new_local(email.to_string(), username.to_string(), "Sample".to_string(), "hash".to_string())
    }

    #[actix_web::test]
    async fn test_create_rejects_duplicate_email_case_insensitive() {
        let repo = UserRepository::new(Arc::new(InMemoryDocumentStore::new("users")), None, 60);

        repo.create(sample("kim@example.com", "kim")).await.unwrap();
        let result = repo.create(sample("KIM@example.com", "kim2")).await;

        assert!(matches!(result, Err(AppError::ConflictError(_))));
    }

    #[actix_web::test]
    async fn test_update_invalidates_cached_user() {
        let cache = Arc::new(MapCache::default());
        let repo = UserRepository::new(Arc::new(InMemoryDocumentStore::new("users")), Some(cache.clone()), 60);

        let user = repo.create(sample("lee@example.com", "lee")).await.unwrap();
        let id = user.id.unwrap();

        repo.find_by_object_id(&id).await.unwrap();
        assert!(cache.entries.lock().unwrap().contains_key(&format!("user:{}", id.to_hex())));

        let updated = repo.update(&id, doc! { "headline": "Rust developer" }).await.unwrap().unwrap();
        assert_eq!(updated.headline.as_deref(), Some("Rust developer"));
        assert!(cache.entries.lock().unwrap().is_empty());

        let reloaded = repo.find_by_object_id(&id).await.unwrap().unwrap();
        assert_eq!(reloaded.headline.as_deref(), Some("Rust developer"));
    }

    #[actix_web::test]
    async fn test_find_by_id_rejects_malformed_id() {
        let repo = UserRepository::new(Arc::new(InMemoryDocumentStore::new("users")), None, 60);
        assert!(matches!(repo.find_by_id("not-an-id").await, Err(AppError::ValidationError(_))));
    }
}
