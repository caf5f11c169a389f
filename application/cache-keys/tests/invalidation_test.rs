use cache_keys::{
    Identifier, PrimaryKey, WorkoutLogHash, delete_template_fragment_cache,
    ingredient_key, reset_workout_canonical_form, reset_workout_log,
    template_cache_name, workout_canonical_key, workout_log_list_key,
};
use redis_connection::{CacheTrait, MemoryCache, config::MemoryConfig};

struct Workout {
    id: i64,
}

impl PrimaryKey for Workout {
    fn pk(&self) -> i64 { self.id }
}

fn cache() -> MemoryCache<serde_json::Value> {
    MemoryCache::new(MemoryConfig::default())
}

#[tokio::test]
async fn test_entity_and_raw_identifiers_hit_same_entry() {
    let cache = cache();
    let workout = Workout { id: 42 };
    cache
        .set(&workout_canonical_key(42), &serde_json::json!({"id": 42}))
        .await
        .unwrap();

    reset_workout_canonical_form(&cache, &workout).await;

    assert!(!cache.exists(&workout_canonical_key(42)).await.unwrap());
}

#[tokio::test]
async fn test_reset_workout_log_covers_month_and_day() {
    let cache = cache();
    let user = Identifier::Entity(7);
    let keys = [
        workout_log_list_key(&WorkoutLogHash::month(&user, 2024, 5)),
        workout_log_list_key(&WorkoutLogHash::day(&user, 2024, 5, None)),
    ];
    for key in &keys {
        cache.set(key, &serde_json::json!([])).await.unwrap();
    }
    let unrelated = ingredient_key(1);
    cache.set(&unrelated, &serde_json::json!("oats")).await.unwrap();

    reset_workout_log(&cache, 7, 2024, 5, None).await;

    for key in &keys {
        assert!(!cache.exists(key).await.unwrap());
    }
    assert!(cache.exists(&unrelated).await.unwrap());
}

#[tokio::test]
async fn test_fragment_invalidation_is_idempotent() {
    let cache = cache().with_secondary_prefix("views");
    let key = template_cache_name("workout-detail", &[&3, &"en"]);
    cache.set(&key, &serde_json::json!("<p/>")).await.unwrap();
    cache
        .set(&format!("views:{key}"), &serde_json::json!("<html/>"))
        .await
        .unwrap();

    assert!(delete_template_fragment_cache(&cache, "workout-detail", &[&3, &"en"]).await);
    assert!(delete_template_fragment_cache(&cache, "workout-detail", &[&3, &"en"]).await);

    assert!(!cache.exists(&key).await.unwrap());
    assert!(!cache.exists(&format!("views:{key}")).await.unwrap());
}
