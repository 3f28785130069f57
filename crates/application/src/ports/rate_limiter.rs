use async_trait::async_trait;
use std::time::Duration;

/// Per-(client, bucket) admission control.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// `true` admits the call; at most `limit` calls pass per `window`.
    async fn allow(&self, client: &str, bucket: &str, limit: u32, window: Duration) -> bool;

    /// Releases state held for idle clients. Returns how many buckets were dropped.
    fn sweep_idle(&self) -> usize {
        0
    }
}
