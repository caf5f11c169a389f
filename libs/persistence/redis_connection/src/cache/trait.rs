use std::time::Duration;

use crate::core::value::ValueError;

/// Cache-specific error type that doesn't depend on Redis
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Key not found")]
    KeyNotFound,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<ValueError> for CacheError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::Serialization(msg) => Self::SerializationError(msg),
            ValueError::Deserialization(msg) => {
                Self::DeserializationError(msg)
            }
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Backend-agnostic cache client. Callers receive one explicitly instead of
/// reaching for a process-wide cache.
#[async_trait::async_trait]
pub trait CacheTrait: Send + Sync {
    type Value: serde::Serialize
        + serde::de::DeserializeOwned
        + Clone
        + Send
        + Sync;

    /// Check if key exists in cache
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Get value from cache
    async fn get(&self, key: &str) -> CacheResult<Self::Value>;

    /// Get value from cache, returning None if not found
    async fn try_get(&self, key: &str) -> CacheResult<Option<Self::Value>> {
        match self.get(key).await {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::KeyNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set value in cache
    async fn set(&self, key: &str, value: &Self::Value) -> CacheResult<()>;

    /// Set value with expiration. A zero TTL removes the entry.
    async fn set_with_ttl(
        &self, key: &str, value: &Self::Value, ttl: Duration,
    ) -> CacheResult<()>;

    /// Set value only if it doesn't exist
    async fn set_if_not_exist(
        &self, key: &str, value: &Self::Value,
    ) -> CacheResult<bool>;

    /// Remove key from cache. Returns whether an entry was present.
    async fn remove(&self, key: &str) -> CacheResult<bool>;

    /// Clear all entries (optional operation)
    async fn clear(&self) -> CacheResult<()> {
        Err(CacheError::Unsupported(
            "Clear operation not supported by this cache implementation"
                .to_string(),
        ))
    }

    /// Secondary storage key the backend keeps for `key`, if any
    fn translate_key(&self, _key: &str) -> Option<String> { None }
}
