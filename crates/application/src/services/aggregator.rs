use crate::ports::{get_json, set_json, CacheStore};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::{merge, normalize_host, DomainError, SubdomainEntry};
use tokio::sync::Mutex;
use tracing::debug;

/// Owns the stored `SubdomainEntry` per host and serializes writers per host.
pub struct Aggregator {
    cache: Arc<dyn CacheStore>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    ttl: Option<Duration>,
}

impl Aggregator {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self {
            cache,
            in_flight: DashMap::new(),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn cache_key(host: &str) -> String {
        format!("entry:{}", host)
    }

    /// Read-merge-write for one observation.
    ///
    /// Calls for the same host run one at a time in arrival order, each seeing
    /// the previous result; calls for different hosts never wait on each other.
    pub async fn upsert(&self, entry: SubdomainEntry) -> Result<SubdomainEntry, DomainError> {
        let host = normalize_host(&entry.host)?;
        let lock = self
            .in_flight
            .entry(host.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let merged = {
            let _guard = lock.lock().await;
            let key = Self::cache_key(&host);
            let existing: Option<SubdomainEntry> = get_json(self.cache.as_ref(), &key).await;
            let merged = merge(existing.as_ref(), SubdomainEntry { host: host.clone(), ..entry });
            set_json(self.cache.as_ref(), &key, &merged, self.ttl).await;
            merged
        };

        // Only the map and this call hold the marker: nobody is queued behind us.
        self.in_flight
            .remove_if(&host, |_, current| Arc::ptr_eq(current, &lock) && Arc::strong_count(current) == 2);

        debug!(host = %host, sources = merged.sources.len(), "Entry upserted");
        Ok(merged)
    }

    pub async fn get(&self, host: &str) -> Result<Option<SubdomainEntry>, DomainError> {
        let host = normalize_host(host)?;
        Ok(get_json(self.cache.as_ref(), &Self::cache_key(&host)).await)
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}
