use super::{FetchOptions, ResilientFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::RemoteListSource;
use subrecon_domain::DomainError;

/// Plain-text lists over HTTP.
pub struct HttpRemoteList {
    fetcher: Arc<ResilientFetcher>,
    options: FetchOptions,
}

impl HttpRemoteList {
    pub fn new(fetcher: Arc<ResilientFetcher>, timeout: Duration) -> Self {
        Self {
            fetcher,
            options: FetchOptions::new(2, Duration::from_millis(500), timeout),
        }
    }

    pub fn with_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.options = FetchOptions::new(attempts, backoff, self.options.timeout);
        self
    }
}

#[async_trait]
impl RemoteListSource for HttpRemoteList {
    async fn fetch_text(&self, url: &str) -> Result<String, DomainError> {
        self.fetcher.get_text(url, &[], self.options).await
    }
}
