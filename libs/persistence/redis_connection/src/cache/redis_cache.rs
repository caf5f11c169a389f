use std::{marker::PhantomData, time::Duration};

use async_trait::async_trait;
use deadpool_redis::{
    Connection, Pool,
    redis::{self, AsyncCommands},
};
use serde::{Deserialize, Serialize};

use super::{
    secondary_key,
    r#trait::{CacheError, CacheResult, CacheTrait},
};
use crate::core::value::Json;

/// Redis cache implementation using deadpool Redis pool
pub struct RedisCache<T> {
    pool: Pool,
    secondary_prefix: Option<String>,
    __phantom: PhantomData<T>,
}

impl<T> RedisCache<T> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            secondary_prefix: None,
            __phantom: PhantomData,
        }
    }

    /// Report `{prefix}:{key}` as the secondary storage key of every entry
    pub fn with_secondary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.secondary_prefix = Some(prefix.into());
        self
    }

    async fn connection(&self) -> CacheResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}

fn backend_error(err: redis::RedisError) -> CacheError {
    CacheError::Backend(err.to_string())
}

#[async_trait]
impl<T> CacheTrait for RedisCache<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static,
{
    type Value = T;

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        conn.exists(key).await.map_err(backend_error)
    }

    async fn get(&self, key: &str) -> CacheResult<Self::Value> {
        let mut conn = self.connection().await?;
        let json: Option<Json<T>> =
            conn.get(key).await.map_err(backend_error)?;
        json.map(Json::inner).ok_or(CacheError::KeyNotFound)
    }

    async fn set(&self, key: &str, value: &Self::Value) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set(key, Json(value.clone()))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn set_with_ttl(
        &self, key: &str, value: &Self::Value, ttl: Duration,
    ) -> CacheResult<()> {
        if ttl.is_zero() {
            self.remove(key).await?;
            return Ok(());
        }
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(key, Json(value.clone()), ttl.as_secs().max(1))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn set_if_not_exist(
        &self, key: &str, value: &Self::Value,
    ) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        conn.set_nx(key, Json(value.clone()))
            .await
            .map_err(backend_error)
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        let count: u32 = conn.del(key).await.map_err(backend_error)?;
        Ok(count > 0)
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    fn translate_key(&self, key: &str) -> Option<String> {
        self.secondary_prefix
            .as_deref()
            .map(|prefix| secondary_key(prefix, key))
    }
}
