pub mod redis_window;
pub mod token_bucket;

pub use redis_window::RedisWindowLimiter;
pub use token_bucket::TokenBucketLimiter;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::RateLimiter;
use tracing::warn;

/// Redis fixed window when available, local token bucket otherwise or on any Redis error.
pub struct HybridRateLimiter {
    shared: Option<RedisWindowLimiter>,
    local: Arc<TokenBucketLimiter>,
}

impl HybridRateLimiter {
    pub fn new(shared: Option<RedisWindowLimiter>, local: Arc<TokenBucketLimiter>) -> Self {
        Self { shared, local }
    }

    pub fn local(&self) -> &Arc<TokenBucketLimiter> {
        &self.local
    }
}

#[async_trait]
impl RateLimiter for HybridRateLimiter {
    async fn allow(&self, client: &str, bucket: &str, limit: u32, window: Duration) -> bool {
        if let Some(shared) = &self.shared {
            match shared.try_allow(client, bucket, limit, window).await {
                Ok(allowed) => return allowed,
                Err(e) => {
                    warn!(error = %e, bucket = %bucket, "Shared rate limit failed, using local limiter");
                }
            }
        }
        self.local.consume(client, bucket, limit, window)
    }

    /// Redis windows expire server-side; only local buckets need sweeping.
    fn sweep_idle(&self) -> usize {
        self.local.sweep_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_without_redis_uses_local_buckets() {
        let limiter = HybridRateLimiter::new(None, Arc::new(TokenBucketLimiter::new()));
        let window = Duration::from_secs(60);

        assert!(limiter.allow("c", "scan", 2, window).await);
        assert!(limiter.allow("c", "scan", 2, window).await);
        assert!(!limiter.allow("c", "scan", 2, window).await);
        assert_eq!(limiter.local().len(), 1);
    }
}
