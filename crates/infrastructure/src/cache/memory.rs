use async_trait::async_trait;
use lru::LruCache;
use rustc_hash::FxBuildHasher;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use subrecon_application::ports::CacheStore;
use tokio::time::Instant;

struct MemoryEntry {
    value: Value,
    expires_at: Instant,
}

/// Process-local LRU with a deadline per entry.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, MemoryEntry, FxBuildHasher>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            default_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, MemoryEntry, FxBuildHasher>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(5000, Duration::from_secs(60 * 60))
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.lock()
            .put(key.to_string(), MemoryEntry { value, expires_at });
    }

    async fn del(&self, key: &str) {
        self.lock().pop(key);
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
