//! Tests for builder configuration and store adapter resolution.

use std::sync::Arc;

use reqcache::{MemoryStore, ReqcacheError, RequestCache, StoreConfig};

#[test]
fn default_build_uses_memory_store() {
    let cache = RequestCache::builder().build().unwrap();
    assert_eq!(cache.store().name(), "memory");
}

#[test]
fn memory_adapter_resolves() {
    let cache = RequestCache::builder()
        .store_adapter("memory")
        .build()
        .unwrap();
    assert_eq!(cache.store().name(), "memory");
}

#[test]
fn redis_adapter_resolves_without_connecting() {
    // Construction only validates the URL; no connection is made until
    // the first operation.
    let cache = RequestCache::builder()
        .store_adapter("redis")
        .build()
        .unwrap();
    assert_eq!(cache.store().name(), "redis");
}

#[test]
fn unknown_adapter_fails_construction_with_its_name() {
    let err = RequestCache::builder()
        .store_adapter("memcached")
        .build()
        .unwrap_err();
    match err {
        ReqcacheError::Configuration(message) => {
            assert!(message.contains("memcached"), "message: {message}");
        }
        other => panic!("expected Configuration error, got {other:?}"),
    }
}

#[test]
fn explicit_store_config_is_used() {
    let cache = RequestCache::builder()
        .store(StoreConfig::Redis {
            url: "redis://cache.internal:6380".to_string(),
        })
        .build()
        .unwrap();
    assert_eq!(cache.store().name(), "redis");
}

#[test]
fn invalid_redis_url_fails_construction() {
    let err = RequestCache::builder()
        .store(StoreConfig::Redis {
            url: "not-a-redis-url".to_string(),
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, ReqcacheError::Configuration(_)));
}

#[test]
fn injected_store_instance_is_used() {
    let store: Arc<dyn reqcache::Store> = Arc::new(MemoryStore::new());
    let cache = RequestCache::builder()
        .store_instance(store.clone())
        .build()
        .unwrap();
    assert_eq!(cache.store().name(), "memory");
    assert!(Arc::ptr_eq(&store, cache.store()));
}

#[test]
fn adapter_name_parsing() {
    assert_eq!(
        StoreConfig::from_adapter("memory").unwrap(),
        StoreConfig::Memory
    );
    assert_eq!(
        StoreConfig::from_adapter("redis").unwrap(),
        StoreConfig::Redis {
            url: StoreConfig::DEFAULT_REDIS_URL.to_string()
        }
    );
    assert!(StoreConfig::from_adapter("sqlite").is_err());
}
