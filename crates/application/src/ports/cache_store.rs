use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Key/value store with per-entry TTL.
///
/// Backend failures never reach callers: a failed `get` reads as a miss and a
/// failed `set` or `del` is dropped. Racing writers on one key are
/// last-write-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;

    /// `ttl = None` applies the backend default.
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>);

    async fn del(&self, key: &str);

    fn backend_name(&self) -> &'static str;
}

/// Reads `key` and decodes it as `T`; undecodable values read as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    let value = cache.get(key).await?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(key = %key, error = %e, "Cached value has unexpected shape");
            None
        }
    }
}

pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Option<Duration>,
) {
    match serde_json::to_value(value) {
        Ok(v) => cache.set(key, v, ttl).await,
        Err(e) => debug!(key = %key, error = %e, "Value not cacheable"),
    }
}
