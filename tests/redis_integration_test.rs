use std::{env, time::Duration};

use blinks::{
    blink::Blink,
    storage::{BlinkStore, redis::RedisStorage},
};

/// Get Redis URL from environment
fn get_redis_url() -> String {
    env::var("TEST_REDIS_URL")
        .or_else(|_| env::var("REDIS_URL"))
        .unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn redis_storage() -> RedisStorage {
    RedisStorage::try_from_redis_url(&get_redis_url(), 4, Duration::from_secs(5))
        .expect("Failed to create Redis storage")
}

/// Blink id unique to this test run
fn unique_id(prefix: &str) -> String {
    format!("{}-{:x}", prefix, uuid::Uuid::new_v4().as_u128())
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_ping() {
    redis_storage().ping().await.expect("Redis should answer PING");
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_insert_and_get_roundtrip() {
    let storage = redis_storage();
    let blink = Blink::new(unique_id("roundtrip"), "https://example.com/page?x=1");

    assert!(storage.insert_blink(&blink).await.unwrap());

    let fetched = storage.get_blink(&blink.blink_url).await.unwrap();
    assert_eq!(fetched, Some(blink.clone()));

    storage.delete_blink(&blink.blink_url).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_insert_existing_key_refused() {
    let storage = redis_storage();
    let id = unique_id("dup");
    let first = Blink::new(id.clone(), "https://a.example");
    let second = Blink::new(id.clone(), "https://b.example");

    assert!(storage.insert_blink(&first).await.unwrap());
    assert!(!storage.insert_blink(&second).await.unwrap());

    let stored = storage.get_blink(&id).await.unwrap().unwrap();
    assert_eq!(stored.redirect_url, "https://a.example");

    storage.delete_blink(&id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_concurrent_creates_single_winner() {
    let storage = redis_storage();
    let id = unique_id("race");

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let storage = storage.clone();
            let blink = Blink::new(id.clone(), format!("https://{}.example", i));
            tokio::spawn(async move { storage.insert_blink(&blink).await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    storage.delete_blink(&id).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_update_keeps_created_at() {
    let storage = redis_storage();
    let blink = Blink {
        blink_url: unique_id("update"),
        redirect_url: "https://golang.org".to_string(),
        created_at: "1700000000".to_string(),
    };
    storage.insert_blink(&blink).await.unwrap();

    let updated = storage
        .update_redirect_url(&blink.blink_url, "https://go.dev")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.redirect_url, "https://go.dev");
    assert_eq!(updated.created_at, "1700000000");

    storage.delete_blink(&blink.blink_url).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_update_missing_does_not_create() {
    let storage = redis_storage();
    let id = unique_id("ghost");

    let result = storage
        .update_redirect_url(&id, "https://go.dev")
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(storage.get_blink(&id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_delete_then_delete_again() {
    let storage = redis_storage();
    let blink = Blink::new(unique_id("delete"), "https://example.com");
    storage.insert_blink(&blink).await.unwrap();

    assert!(storage.delete_blink(&blink.blink_url).await.unwrap());
    assert!(!storage.delete_blink(&blink.blink_url).await.unwrap());
    assert!(storage.get_blink(&blink.blink_url).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_list_includes_created_blinks() {
    let storage = redis_storage();
    let ids: Vec<String> = (0..3).map(|_| unique_id("list")).collect();

    for id in &ids {
        storage
            .insert_blink(&Blink::new(id.clone(), "https://example.com"))
            .await
            .unwrap();
    }

    // Other tests may share the database, so only check our own ids.
    let listed = storage.list_blinks().await.unwrap();
    for id in &ids {
        assert_eq!(
            listed.iter().filter(|b| &b.blink_url == id).count(),
            1,
            "{} should be listed exactly once",
            id
        );
    }

    storage.delete_blink(&ids[0]).await.unwrap();
    let listed = storage.list_blinks().await.unwrap();
    assert!(!listed.iter().any(|b| b.blink_url == ids[0]));

    for id in &ids[1..] {
        storage.delete_blink(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_closed_pool_reports_unavailable() {
    let storage = redis_storage();
    storage.close();

    let err = storage.ping().await.unwrap_err();
    assert!(matches!(err, blinks::error::BlinksError::StoreUnavailable(_)));
}
