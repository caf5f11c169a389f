pub mod memory;
pub mod redis_cache;
pub mod r#trait;

pub use memory::MemoryCache;
pub use r#trait::{CacheError, CacheResult, CacheTrait};
pub use redis_cache::RedisCache;

/// Storage key of the secondary entry mirroring `key` under `prefix`
pub(crate) fn secondary_key(prefix: &str, key: &str) -> String {
    format!("{prefix}:{key}")
}
