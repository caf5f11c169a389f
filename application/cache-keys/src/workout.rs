use std::fmt;

use redis_connection::CacheTrait;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    identifier::Identifier,
    keys::{workout_canonical_key, workout_log_list_key},
    log_cache_error,
};

/// Stable digest naming a cached workout log list.
///
/// A month-scoped hash and a day-scoped hash never collide, even when the
/// day is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkoutLogHash(u64);

impl WorkoutLogHash {
    pub fn month(user: &Identifier, year: i32, month: u32) -> Self {
        Self::digest(&format!("{user}:{year}:{month}"))
    }

    pub fn day(
        user: &Identifier, year: i32, month: u32, day: Option<u32>,
    ) -> Self {
        match day {
            Some(day) => Self::digest(&format!("{user}:{year}:{month}:{day}")),
            None => Self::digest(&format!("{user}:{year}:{month}:-")),
        }
    }

    fn digest(input: &str) -> Self {
        let digest = Sha256::digest(input.as_bytes());
        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }
}

impl fmt::Display for WorkoutLogHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Drops the cached canonical representation of a workout
pub async fn reset_workout_canonical_form<C>(
    cache: &C, workout: impl Into<Identifier>,
) where
    C: CacheTrait + ?Sized,
{
    let key = workout_canonical_key(workout);
    if let Some(removed) = log_cache_error(cache.remove(&key).await, &key) {
        info!(cache.key = %key, removed, "Reset workout canonical form");
    }
}

/// Drops the cached log lists of a user for a month and for one of its
/// days, so both month and day views are rebuilt.
pub async fn reset_workout_log<C>(
    cache: &C, user: impl Into<Identifier>, year: i32, month: u32,
    day: Option<u32>,
) where
    C: CacheTrait + ?Sized,
{
    let user = user.into();
    let hashes = [
        WorkoutLogHash::month(&user, year, month),
        WorkoutLogHash::day(&user, year, month, day),
    ];

    for hash in &hashes {
        let key = workout_log_list_key(hash);
        log_cache_error(cache.remove(&key).await, &key);
    }
    info!(user = %user, year, month, ?day, "Reset workout log cache");
}

#[cfg(test)]
mod tests {
    use redis_connection::MemoryCache;

    use super::*;

    fn user() -> Identifier { Identifier::Entity(1) }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(
            WorkoutLogHash::month(&user(), 2024, 5),
            WorkoutLogHash::month(&Identifier::from(1), 2024, 5)
        );
        assert_eq!(WorkoutLogHash::month(&user(), 2024, 5).to_string().len(), 16);
    }

    #[test]
    fn test_month_and_day_hashes_differ() {
        let month = WorkoutLogHash::month(&user(), 2024, 5);

        assert_ne!(month, WorkoutLogHash::day(&user(), 2024, 5, None));
        assert_ne!(month, WorkoutLogHash::day(&user(), 2024, 5, Some(3)));
        assert_ne!(
            WorkoutLogHash::day(&user(), 2024, 5, None),
            WorkoutLogHash::day(&user(), 2024, 5, Some(3))
        );
        assert_ne!(month, WorkoutLogHash::month(&user(), 2024, 6));
    }

    #[tokio::test]
    async fn test_reset_workout_canonical_form() {
        let cache = MemoryCache::<String>::default();
        cache
            .set("workout-canonical-representation-42", &"{}".to_string())
            .await
            .unwrap();
        cache.set("workout-canonical-representation-43", &"{}".to_string())
            .await
            .unwrap();

        reset_workout_canonical_form(&cache, 42).await;

        assert!(!cache.exists("workout-canonical-representation-42").await.unwrap());
        assert!(cache.exists("workout-canonical-representation-43").await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_workout_log_without_day_deletes_both_entries() {
        let cache = MemoryCache::<String>::default();
        let month_key =
            workout_log_list_key(&WorkoutLogHash::month(&user(), 2024, 5));
        let day_key =
            workout_log_list_key(&WorkoutLogHash::day(&user(), 2024, 5, None));
        cache.set(&month_key, &"[]".to_string()).await.unwrap();
        cache.set(&day_key, &"[]".to_string()).await.unwrap();

        reset_workout_log(&cache, 1, 2024, 5, None).await;

        assert!(!cache.exists(&month_key).await.unwrap());
        assert!(!cache.exists(&day_key).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_workout_log_with_day_keeps_other_days() {
        let cache = MemoryCache::<String>::default();
        let day_key =
            workout_log_list_key(&WorkoutLogHash::day(&user(), 2024, 5, Some(3)));
        let other_day_key =
            workout_log_list_key(&WorkoutLogHash::day(&user(), 2024, 5, Some(4)));
        cache.set(&day_key, &"[]".to_string()).await.unwrap();
        cache.set(&other_day_key, &"[]".to_string()).await.unwrap();

        reset_workout_log(&cache, 1, 2024, 5, Some(3)).await;

        assert!(!cache.exists(&day_key).await.unwrap());
        assert!(cache.exists(&other_day_key).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_on_empty_cache_is_noop() {
        let cache = MemoryCache::<String>::default();

        reset_workout_log(&cache, 1, 2024, 5, None).await;
        reset_workout_canonical_form(&cache, 42).await;

        assert!(!cache.exists(&workout_canonical_key(42)).await.unwrap());
    }
}
