use std::{marker::PhantomData, time::Duration};

use bytes::Bytes;
use moka::future::Cache;

use super::{
    secondary_key,
    r#trait::{CacheError, CacheResult, CacheTrait},
};
use crate::{
    config::MemoryConfig,
    core::value::{CacheValue, Json},
};

/// In-process cache backed by moka
pub struct MemoryCache<T> {
    cache: Cache<String, Bytes>,
    secondary_prefix: Option<String>,
    _phantom: PhantomData<T>,
}

impl<T> MemoryCache<T> {
    pub fn new(config: MemoryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl())
            .build();

        Self {
            cache,
            secondary_prefix: None,
            _phantom: PhantomData,
        }
    }

    /// Report `{prefix}:{key}` as the secondary storage key of every entry
    pub fn with_secondary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.secondary_prefix = Some(prefix.into());
        self
    }
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self { Self::new(MemoryConfig::default()) }
}

#[async_trait::async_trait]
impl<T> CacheTrait for MemoryCache<T>
where
    T: serde::Serialize
        + serde::de::DeserializeOwned
        + Clone
        + Send
        + Sync
        + 'static,
{
    type Value = T;

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn get(&self, key: &str) -> CacheResult<Self::Value> {
        let bytes = self.cache.get(key).await.ok_or(CacheError::KeyNotFound)?;
        let json = Json::<T>::from_bytes(&bytes)?;
        Ok(json.inner())
    }

    async fn set(&self, key: &str, value: &Self::Value) -> CacheResult<()> {
        let bytes = Json(value.clone()).to_bytes()?;
        self.cache.insert(key.to_string(), Bytes::from(bytes)).await;
        Ok(())
    }

    async fn set_with_ttl(
        &self, key: &str, value: &Self::Value, ttl: Duration,
    ) -> CacheResult<()> {
        if ttl.is_zero() {
            self.cache.invalidate(key).await;
            return Ok(());
        }
        // Moka applies the cache-wide TTL; per-entry TTLs are not tracked
        self.set(key, value).await
    }

    async fn set_if_not_exist(
        &self, key: &str, value: &Self::Value,
    ) -> CacheResult<bool> {
        if self.cache.contains_key(key) {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.cache.invalidate_all();
        Ok(())
    }

    fn translate_key(&self, key: &str) -> Option<String> {
        self.secondary_prefix
            .as_deref()
            .map(|prefix| secondary_key(prefix, key))
    }
}
