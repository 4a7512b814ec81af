//! 캐싱 계층 모듈
//!
//! 캐시는 [`CacheStore`] 트레이트로 추상화되어 있으며, `REDIS_URL`이 설정된 경우에만
//! [`redis::RedisClient`] 구현이 주입됩니다. 캐시가 없어도 모든 기능은 동작합니다.
//!
//! # 키 규칙
//!
//! - `user:{user_id}` - 인증 게이트가 조회하는 사용자 레코드 (JSON)
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379
//! ```

pub mod redis;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use crate::core::errors::{AppError, AppResult};

/// 문자열 값 기반 캐시 인터페이스
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    async fn set_raw(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// JSON 역직렬화 조회. 손상된 값은 캐시 미스로 취급합니다.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> AppResult<Option<T>> {
    match cache.get_raw(key).await? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("캐시 값 역직렬화 실패 ({}): {}", key, e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + Sync>(cache: &dyn CacheStore, key: &str, value: &T, ttl_seconds: u64) -> AppResult<()> {
    let raw = serde_json::to_string(value)
        .map_err(|e| AppError::InternalError(format!("캐시 직렬화 실패: {}", e)))?;
    cache.set_raw(key, raw, ttl_seconds).await
}
