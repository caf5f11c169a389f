use std::ops::{Deref, DerefMut};

use deadpool_redis::redis::{
    ErrorKind, FromRedisValue, RedisError, RedisResult, RedisWrite,
    ToRedisArgs, Value,
};
use serde::{Deserialize, Serialize};

/// The unified trait for all cacheable values
pub trait CacheValue: Sized + Send + Sync {
    /// Serialize to bytes for any cache backend
    fn to_bytes(&self) -> Result<Vec<u8>, ValueError>;

    /// Deserialize from bytes
    fn from_bytes(bytes: &[u8]) -> Result<Self, ValueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

/// JSON wrapper for anything stored in a cache backend
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn new(value: T) -> Self { Self(value) }

    pub fn inner(self) -> T { self.0 }

    pub fn as_inner(&self) -> &T { &self.0 }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self { Json(value) }
}

impl<T> CacheValue for Json<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    fn to_bytes(&self) -> Result<Vec<u8>, ValueError> {
        serde_json::to_vec(&self.0)
            .map_err(|e| ValueError::Serialization(e.to_string()))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ValueError> {
        serde_json::from_slice(bytes)
            .map(Json)
            .map_err(|e| ValueError::Deserialization(e.to_string()))
    }
}

impl<T> ToRedisArgs for Json<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        // serde_json only fails on maps with non-string keys
        let bytes = self.to_bytes().unwrap_or_default();
        out.write_arg(&bytes);
    }
}

impl<T> FromRedisValue for Json<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        match v {
            Value::BulkString(bytes) => {
                Self::from_bytes(bytes).map_err(|e| {
                    RedisError::from((
                        ErrorKind::TypeError,
                        "Invalid JSON",
                        e.to_string(),
                    ))
                })
            }
            Value::Nil => {
                Err(RedisError::from((ErrorKind::TypeError, "Key not found")))
            }
            _ => {
                Err(RedisError::from((
                    ErrorKind::TypeError,
                    "Unexpected redis value for JSON",
                )))
            }
        }
    }
}
