use crate::{AntifilterRefreshJob, BucketSweepJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Starts the registered maintenance jobs under one shutdown token.
///
/// Every job is rebound to the runner's token, so cancelling the token
/// returned by [`start`](Self::start) stops all of them.
///
/// ```rust,ignore
/// let shutdown = JobRunner::new()
///     .with_bucket_sweep(BucketSweepJob::new(limiter))
///     .with_antifilter_refresh(AntifilterRefreshJob::new(antifilter).with_interval(3600))
///     .start()
///     .await;
/// // ... run the command ...
/// shutdown.cancel();
/// ```
pub struct JobRunner {
    shutdown: CancellationToken,
    bucket_sweep: Option<BucketSweepJob>,
    antifilter_refresh: Option<AntifilterRefreshJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            bucket_sweep: None,
            antifilter_refresh: None,
        }
    }

    /// Share an existing token instead of the runner's own.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn with_bucket_sweep(mut self, job: BucketSweepJob) -> Self {
        self.bucket_sweep = Some(job);
        self
    }

    pub fn with_antifilter_refresh(mut self, job: AntifilterRefreshJob) -> Self {
        self.antifilter_refresh = Some(job);
        self
    }

    pub async fn start(self) -> CancellationToken {
        let mut started = 0usize;

        if let Some(job) = self.bucket_sweep {
            Arc::new(job.with_cancellation(self.shutdown.clone()))
                .start()
                .await;
            started += 1;
        }

        if let Some(job) = self.antifilter_refresh {
            Arc::new(job.with_cancellation(self.shutdown.clone()))
                .start()
                .await;
            started += 1;
        }

        info!(jobs = started, "Background jobs started");
        self.shutdown
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
