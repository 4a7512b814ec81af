//! # Redis 캐시 클라이언트
//!
//! 호출마다 멀티플렉싱 연결을 얻어 명령을 실행합니다.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use crate::core::errors::{AppError, AppResult};
use super::CacheStore;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn redis_err(e: redis::RedisError) -> AppError {
    AppError::RedisError(e.to_string())
}

impl RedisClient {
    /// 연결 후 `PING`으로 상태를 확인합니다.
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(redis_err)?;
        conn.get(key).await.map_err(redis_err)
    }

    async fn set_raw(&self, key: &str, value: String, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(redis_err)?;
        conn.set_ex(key, value, ttl_seconds).await.map_err(redis_err)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await.map_err(redis_err)?;
        conn.del(key).await.map_err(redis_err)
    }
}
