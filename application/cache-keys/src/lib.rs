//! Cache key mapping for workout manager resources.
//!
//! Key formatting is stateless: every function takes the identifiers it
//! needs and returns the key. Invalidation helpers take the cache client
//! explicitly and never report cache errors to the caller.

mod identifier;
mod keys;
mod template;
mod workout;

pub use identifier::{Identifier, PrimaryKey};
pub use keys::*;
pub use template::{delete_template_fragment_cache, template_cache_name};
pub use workout::{
    WorkoutLogHash, reset_workout_canonical_form, reset_workout_log,
};

/// Logs and drops a cache failure
fn log_cache_error<T>(
    result: redis_connection::CacheResult<T>, key: &str,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(cache.key = key, error = %e, "Cache operation failed");
            None
        }
    }
}
