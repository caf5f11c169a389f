use std::time::Duration;

use redis_connection::{CacheError, CacheTrait, RedisCache};
use test_utils::TestRedisContainer;

async fn setup_cache() -> (TestRedisContainer, RedisCache<String>) {
    let container = TestRedisContainer::new().await.unwrap();
    let cache = RedisCache::new(container.pool.clone());
    (container, cache)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_set_get_and_exists() {
    let (_container, cache) = setup_cache().await;

    assert!(!cache.exists("ingredient-1").await.unwrap());
    cache.set("ingredient-1", &"oats".to_string()).await.unwrap();

    assert!(cache.exists("ingredient-1").await.unwrap());
    assert_eq!(cache.get("ingredient-1").await.unwrap(), "oats");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_missing_key_is_not_found() {
    let (_container, cache) = setup_cache().await;

    assert!(matches!(
        cache.get("ingredient-2").await,
        Err(CacheError::KeyNotFound)
    ));
    assert_eq!(cache.try_get("ingredient-2").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_remove_reports_presence() {
    let (_container, cache) = setup_cache().await;
    cache.set("language-1", &"en".to_string()).await.unwrap();

    assert!(cache.remove("language-1").await.unwrap());
    assert!(!cache.remove("language-1").await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_set_with_ttl() {
    let (container, cache) = setup_cache().await;

    cache
        .set_with_ttl("language-1", &"en".to_string(), Duration::from_secs(60))
        .await
        .unwrap();
    let ttl = container.ttl("language-1").await.unwrap();
    assert!((1..=60).contains(&ttl));

    cache
        .set_with_ttl("language-1", &"en".to_string(), Duration::ZERO)
        .await
        .unwrap();
    assert!(!cache.exists("language-1").await.unwrap());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_set_if_not_exist() {
    let (_container, cache) = setup_cache().await;

    assert!(cache.set_if_not_exist("k", &"a".to_string()).await.unwrap());
    assert!(!cache.set_if_not_exist("k", &"b".to_string()).await.unwrap());
    assert_eq!(cache.get("k").await.unwrap(), "a");
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_translate_key() {
    let (container, plain) = setup_cache().await;
    let prefixed = RedisCache::<String>::new(container.pool.clone())
        .with_secondary_prefix("views");

    assert_eq!(plain.translate_key("workout-1"), None);
    assert_eq!(
        prefixed.translate_key("workout-1").as_deref(),
        Some("views:workout-1")
    );
}
