//! Reqcache - transparent TTL caching for outbound HTTP requests
//!
//! This crate wraps an HTTP client with a caching layer: repeated identical
//! requests within a time window are served from a pluggable store instead
//! of re-issued over the network. Requests are normalized into
//! deterministic, collision-resistant keys, so parameter insertion order
//! never splits the cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use reqcache::RequestCache;
//!
//! #[tokio::main]
//! async fn main() -> reqcache::Result<()> {
//!     let cache = RequestCache::builder()
//!         .store_adapter("memory")
//!         .build()?;
//!
//!     // First call hits the network, second is served from the store.
//!     let fresh = cache.get("http://api.example.com/users", &[("page", "1")], 60).await?;
//!     assert!(!fresh.cache.hit);
//!
//!     let cached = cache.get("http://api.example.com/users", &[("page", "1")], 60).await?;
//!     assert!(cached.cache.hit);
//!     assert_eq!(fresh.body, cached.body);
//!     Ok(())
//! }
//! ```
//!
//! # Store backends
//!
//! Two backends ship with the crate, selected by adapter name at
//! construction: `"memory"` (process-local map with per-key expiry timers)
//! and `"redis"` (TTL delegated to a Redis instance). Custom backends
//! implement the [`Store`] trait and plug in via
//! [`RequestCacheBuilder::store_instance()`].

pub mod client;
pub mod error;
pub mod key;
pub mod request;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use client::{RequestCache, RequestCacheBuilder};
pub use error::{ReqcacheError, Result};
pub use key::derive_key;
pub use request::{
    CachingDefaults, Method, NormalizedRequest, RequestDefaults, RequestDescriptor,
    ResolvedCaching,
};
pub use store::{CacheEntry, MemoryStore, RedisStore, Store, StoreConfig, StoreStats};
pub use types::{CacheInfo, CachedResponse};
