use std::sync::Arc;
use std::time::Duration;
use subrecon_application::services::AntifilterService;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Re-downloads the antifilter lists ahead of their cache expiry.
pub struct AntifilterRefreshJob {
    service: Arc<AntifilterService>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl AntifilterRefreshJob {
    pub fn new(service: Arc<AntifilterService>) -> Self {
        Self {
            service,
            interval_secs: 6 * 60 * 60,
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
            "Starting antifilter refresh job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("AntifilterRefreshJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let (domains, ranges) = self.service.refresh().await;
                        if domains == 0 && ranges == 0 {
                            warn!("AntifilterRefreshJob: both lists came back empty");
                        }
                    }
                }
            }
        });
    }
}
