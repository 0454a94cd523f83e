//! Live Redis tests - ignored by default, run with:
//! `REDIS_URL=redis://127.0.0.1:6379 cargo test --test redis_store_test -- --ignored`
//!
//! Each test uses its own key namespace so runs don't interfere.

use std::collections::BTreeMap;
use std::time::Duration;

use reqcache::{CacheEntry, RedisStore, Store};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

fn store() -> RedisStore {
    RedisStore::open(&redis_url()).expect("redis url should parse")
}

fn entry(body: &str) -> CacheEntry {
    CacheEntry {
        status: 200,
        headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
        body: body.to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn round_trip_preserves_the_entry() {
    let store = store();
    let key = "reqcache-test:roundtrip";
    store.remove(key).await.unwrap();

    store
        .set(key, entry("payload"), Duration::from_secs(30))
        .await
        .unwrap();
    let got = store.get(key).await.unwrap();
    assert_eq!(got, Some(entry("payload")));

    store.remove(key).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn expiry_is_delegated_to_redis() {
    let store = store();
    let key = "reqcache-test:expiry";

    store
        .set(key, entry("v"), Duration::from_secs(1))
        .await
        .unwrap();
    assert!(store.get(key).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn remove_is_idempotent() {
    let store = store();
    let key = "reqcache-test:remove";

    store.remove(key).await.unwrap();
    store
        .set(key, entry("v"), Duration::from_secs(30))
        .await
        .unwrap();
    store.remove(key).await.unwrap();
    store.remove(key).await.unwrap();
    assert_eq!(store.get(key).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn undeserializable_value_reads_as_miss() {
    let key = "reqcache-test:corrupt";

    // Plant garbage under the key through a raw connection.
    let client = redis::Client::open(redis_url().as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: () = redis::AsyncCommands::set_ex(&mut conn, key, "{not json", 30)
        .await
        .unwrap();

    let store = store();
    assert_eq!(store.get(key).await.unwrap(), None);
    assert_eq!(store.stats().misses, 1);

    store.remove(key).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn stats_track_hits_and_misses() {
    let store = store();
    let key = "reqcache-test:stats";
    store.remove(key).await.unwrap();

    assert_eq!(store.get(key).await.unwrap(), None);
    store
        .set(key, entry("v"), Duration::from_secs(30))
        .await
        .unwrap();
    assert!(store.get(key).await.unwrap().is_some());

    let stats = store.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);

    store.remove(key).await.unwrap();
}
