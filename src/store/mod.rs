//! Storage backends for cached responses.
//!
//! Every backend implements the [`Store`] contract:
//!
//! - [`MemoryStore`] — process-local map with per-key expiry timers.
//!   Entries die with the process.
//! - [`RedisStore`] — delegates storage and TTL enforcement to a Redis
//!   instance (`SET .. EX`), serializing entries to JSON text. Entries are
//!   owned by the external service and merely referenced by key.
//!
//! Backends are selected at construction through [`StoreConfig`] — a tagged
//! variant resolved from an adapter name (`"memory"`, `"redis"`), never by
//! dynamic lookup at call time. An unknown adapter name fails the builder
//! with a descriptive [`Configuration`](crate::ReqcacheError::Configuration)
//! error.
//!
//! Stores are a best-effort optimization layer, never a source of truth:
//! a missing or expired key is `Ok(None)`, and only backend failures
//! (connectivity, protocol) surface as errors.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ReqcacheError, Result};

/// What a store persists for one cache key: the serializable subset of a
/// response, never the transport object itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Cumulative hit/miss counters for one store instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
}

/// Contract shared by all storage backends.
///
/// All operations are async from the caller's perspective and complete
/// exactly once. `get` never fails for a missing or expired key — absence
/// is `Ok(None)` and counts as a miss.
#[async_trait]
pub trait Store: Send + Sync {
    /// Adapter name for logs and metrics (e.g. "memory", "redis").
    fn name(&self) -> &'static str;

    /// Look up an entry. `Ok(None)` on miss; errors are reserved for
    /// backend failures.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Store an entry under `key` for `ttl`. Re-`set`ting an existing key
    /// restarts its TTL window from this call.
    ///
    /// Fails with a validation error when `key` is empty or `ttl` is zero.
    async fn set(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<()>;

    /// Remove an entry. Idempotent: removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Snapshot of the cumulative hit/miss counters.
    fn stats(&self) -> StoreStats;
}

/// Backend selection, resolved at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local map (the default).
    Memory,
    /// Redis instance reachable at `url` (e.g. `redis://127.0.0.1:6379`).
    Redis { url: String },
}

impl StoreConfig {
    /// Default Redis connection URL used when only the adapter name is given.
    pub const DEFAULT_REDIS_URL: &'static str = "redis://127.0.0.1:6379";

    /// Resolve an adapter name to a config.
    ///
    /// Recognized names: `"memory"`, `"redis"`. Anything else is a
    /// configuration error naming the offending adapter.
    pub fn from_adapter(name: &str) -> Result<Self> {
        match name {
            "memory" => Ok(StoreConfig::Memory),
            "redis" => Ok(StoreConfig::Redis {
                url: Self::DEFAULT_REDIS_URL.to_string(),
            }),
            other => Err(ReqcacheError::Configuration(format!(
                "no store implementation for adapter \"{other}\" (expected \"memory\" or \"redis\")"
            ))),
        }
    }

    pub(crate) fn build(&self) -> Result<Arc<dyn Store>> {
        match self {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::Redis { url } => Ok(Arc::new(RedisStore::open(url)?)),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory
    }
}

/// Atomic hit/miss counters shared by the store implementations.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ReqcacheError::validation("key", "must not be empty"));
    }
    Ok(())
}

pub(crate) fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(ReqcacheError::validation("ttl", "must be greater than zero"));
    }
    Ok(())
}
