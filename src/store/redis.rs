//! Redis-backed store.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use tracing::warn;

use super::{CacheEntry, Counters, Store, StoreStats, validate_key, validate_ttl};
use crate::{ReqcacheError, Result};

/// [`Store`] that delegates storage and TTL enforcement to Redis.
///
/// Entries are serialized to JSON text and written with `SET .. EX`, so
/// expiry is handled server-side and a re-`set` naturally restarts the TTL
/// window. The connection is established lazily on first use through a
/// [`ConnectionManager`], which reconnects on its own after outages; the
/// manager is cheap to clone, so concurrent operations share it safely.
///
/// A value that fails to deserialize is treated as a miss, never an error —
/// corrupted cache data must not break the request it was meant to speed up.
pub struct RedisStore {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    counters: Counters,
}

impl RedisStore {
    /// Create a store for the Redis instance at `url`.
    ///
    /// Validates the URL but does not connect; the first operation does.
    pub fn open(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            ReqcacheError::Configuration(format!("invalid redis url \"{url}\": {e}"))
        })?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            counters: Counters::default(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.connection
            .get_or_try_init(|| async {
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(ReqcacheError::from)
            })
            .await
            .map(|manager| manager.clone())
    }
}

#[async_trait]
impl Store for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        validate_key(key)?;
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        let Some(raw) = raw else {
            self.counters.record_miss();
            return Ok(None);
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => {
                self.counters.record_hit();
                Ok(Some(entry))
            }
            Err(e) => {
                warn!(key, error = %e, "discarding undeserializable cache entry");
                self.counters.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<()> {
        validate_key(key)?;
        validate_ttl(ttl)?;
        let payload = serde_json::to_string(&entry)
            .map_err(|e| ReqcacheError::Store(format!("serialize entry: {e}")))?;
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, payload, ttl.as_secs()).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let mut conn = self.connection().await?;
        // DEL of an absent key replies 0; still a success.
        let _: () = conn.del(key).await?;
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }
}
