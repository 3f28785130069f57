use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::RateLimiter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically drops rate-limit buckets of clients that went quiet.
pub struct BucketSweepJob {
    limiter: Arc<dyn RateLimiter>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl BucketSweepJob {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval_secs,
            "Starting rate-limit bucket sweep job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("BucketSweepJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let removed = self.limiter.sweep_idle();
                        debug!(removed, "BucketSweepJob: sweep completed");
                    }
                }
            }
        });
    }
}
