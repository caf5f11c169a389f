use std::fmt::Display;

use md5::{Digest, Md5};
use redis_connection::CacheTrait;
use tracing::{debug, info};

use crate::log_cache_error;

/// Key under which a template fragment cache entry is stored: the fragment
/// name plus the MD5 of the `:`-joined arguments.
pub fn template_cache_name(
    fragment_name: &str, args: &[&(dyn Display + Sync)],
) -> String {
    let joined = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(":");
    let digest = hex::encode(Md5::digest(joined.as_bytes()));

    format!("template.cache.{fragment_name}.{digest}")
}

/// Deletes a cached template fragment.
///
/// Returns `true` when the backend keeps a secondary storage key for the
/// fragment, in which case that entry is cleared too.
pub async fn delete_template_fragment_cache<C>(
    cache: &C, fragment_name: &str, args: &[&(dyn Display + Sync)],
) -> bool
where
    C: CacheTrait + ?Sized,
{
    let key = template_cache_name(fragment_name, args);
    debug!(cache.key = %key, "Deleting template fragment");
    log_cache_error(cache.remove(&key).await, &key);

    let Some(storage_key) = cache.translate_key(&key) else {
        return false;
    };

    // Check and clear are two round trips. A refresh landing in between
    // survives this invalidation and stays stale until it expires.
    if log_cache_error(cache.exists(&storage_key).await, &storage_key)
        .unwrap_or(false)
    {
        log_cache_error(cache.remove(&storage_key).await, &storage_key);
        info!(cache.key = %storage_key, "Cleared secondary fragment entry");
    }

    true
}
