use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use subrecon_application::ports::RateLimiter;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
    window: Duration,
}

/// Per-process token buckets keyed by `{bucket}:{client}`.
///
/// A bucket starts full at `limit` tokens and refills continuously at
/// `limit / window`. A bucket untouched for two of its windows is idle.
pub struct TokenBucketLimiter {
    buckets: DashMap<String, Bucket>,
}

impl TokenBucketLimiter {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    pub fn consume(&self, client: &str, bucket: &str, limit: u32, window: Duration) -> bool {
        let now = Instant::now();
        let limit = f64::from(limit);
        let window_ms = (window.as_secs_f64() * 1000.0).max(1.0);

        let mut entry = self
            .buckets
            .entry(format!("{}:{}", bucket, client))
            .or_insert(Bucket {
                tokens: limit,
                last_refill: now,
                window,
            });

        let elapsed_ms = now.saturating_duration_since(entry.last_refill).as_secs_f64() * 1000.0;
        entry.tokens = (entry.tokens + elapsed_ms * limit / window_ms).min(limit);
        entry.last_refill = now;
        entry.window = window;

        if entry.tokens >= 1.0 {
            entry.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drops buckets untouched for more than two of their own windows.
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets.retain(|_, b| {
            now.saturating_duration_since(b.last_refill) <= b.window.saturating_mul(2)
        });
        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            debug!(removed, remaining = self.buckets.len(), "Idle rate-limit buckets swept");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for TokenBucketLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for TokenBucketLimiter {
    async fn allow(&self, client: &str, bucket: &str, limit: u32, window: Duration) -> bool {
        self.consume(client, bucket, limit, window)
    }

    fn sweep_idle(&self) -> usize {
        TokenBucketLimiter::sweep_idle(self)
    }
}
