//! Process-local store with per-key expiry timers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use super::{CacheEntry, Counters, Store, StoreStats, validate_key, validate_ttl};
use crate::Result;

struct Slot {
    entry: CacheEntry,
    /// Monotonic tag identifying the `set` that wrote this slot. A timer
    /// may only evict the slot it was armed for.
    generation: u64,
    timer: JoinHandle<()>,
}

type SlotMap = Mutex<HashMap<String, Slot>>;

/// In-process [`Store`] backed by a map plus one expiry timer per key.
///
/// Each `set` arms a fresh timer scheduled `ttl` in the future and cancels
/// any timer already armed for that key, so a key's lifetime is exactly the
/// most recently requested TTL rather than cumulative. `get` and `remove`
/// involve no real I/O but keep the async contract shape.
///
/// Timers hold only a [`Weak`] reference to the map: dropping the store
/// drops all entries immediately and lets pending timers fizzle.
pub struct MemoryStore {
    slots: Arc<SlotMap>,
    next_generation: AtomicU64,
    counters: Counters,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        validate_key(key)?;
        let slots = lock(&self.slots);
        match slots.get(key) {
            Some(slot) => {
                self.counters.record_hit();
                Ok(Some(slot.entry.clone()))
            }
            None => {
                self.counters.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, entry: CacheEntry, ttl: Duration) -> Result<()> {
        validate_key(key)?;
        validate_ttl(ttl)?;

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut slots = lock(&self.slots);
        let timer = tokio::spawn(expire_after(
            Arc::downgrade(&self.slots),
            key.to_string(),
            generation,
            ttl,
        ));
        if let Some(old) = slots.insert(
            key.to_string(),
            Slot {
                entry,
                generation,
                timer,
            },
        ) {
            old.timer.abort();
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if let Some(slot) = lock(&self.slots).remove(key) {
            slot.timer.abort();
        }
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }
}

/// Evict `key` once `ttl` elapses, unless a newer `set` replaced the slot
/// in the meantime (the generation check covers the window between this
/// timer firing and its abort).
async fn expire_after(slots: Weak<SlotMap>, key: String, generation: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    if let Some(slots) = slots.upgrade() {
        let mut slots = lock(&slots);
        if slots.get(&key).is_some_and(|s| s.generation == generation) {
            slots.remove(&key);
        }
    }
}

fn lock(slots: &SlotMap) -> MutexGuard<'_, HashMap<String, Slot>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
