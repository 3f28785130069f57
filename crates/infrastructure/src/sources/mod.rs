//! Passive OSINT connectors.
//!
//! Each connector turns one provider response into raw candidate names.
//! Filtering to the scanned domain happens upstream; a connector only has
//! to swallow its own failures.

pub mod alienvault;
pub mod anubis;
pub mod bufferover;
pub mod certspotter;
pub mod crtsh;
pub mod hackertarget;
pub mod rapiddns;
pub mod threatminer;
pub mod urlscan;
pub mod webarchive;

pub use alienvault::AlienVaultSource;
pub use anubis::AnubisSource;
pub use bufferover::BufferOverSource;
pub use certspotter::CertSpotterSource;
pub use crtsh::CrtShSource;
pub use hackertarget::HackerTargetSource;
pub use rapiddns::RapidDnsSource;
pub use threatminer::ThreatMinerSource;
pub use urlscan::UrlScanSource;
pub use webarchive::WebArchiveSource;

use crate::http::{FetchOptions, ResilientFetcher};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::SourceConnector;
use tracing::debug;

/// HTTP plumbing shared by every connector.
#[derive(Clone)]
pub struct SourceClient {
    fetcher: Arc<ResilientFetcher>,
    timeout: Duration,
}

impl SourceClient {
    pub fn new(fetcher: Arc<ResilientFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    pub(crate) fn options(&self, backoff_ms: u64, timeout_factor: u32) -> FetchOptions {
        FetchOptions::new(2, Duration::from_millis(backoff_ms), self.timeout * timeout_factor)
    }

    pub(crate) async fn text(
        &self,
        source: &'static str,
        url: &str,
        headers: &[(&'static str, &str)],
        options: FetchOptions,
    ) -> Option<String> {
        match self.fetcher.get_text(url, headers, options).await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(source, url = %url, error = %e, "Passive source fetch failed");
                None
            }
        }
    }

    pub(crate) async fn json<T: DeserializeOwned>(
        &self,
        source: &'static str,
        url: &str,
        options: FetchOptions,
    ) -> Option<T> {
        let body = self.text(source, url, &[], options).await?;
        match serde_json::from_str(&body) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!(source, url = %url, error = %e, "Passive source returned unexpected JSON");
                None
            }
        }
    }
}

/// Every built-in connector against its public endpoint.
pub fn default_connectors(client: SourceClient) -> Vec<Arc<dyn SourceConnector>> {
    vec![
        Arc::new(CrtShSource::new(client.clone())),
        Arc::new(CertSpotterSource::new(client.clone())),
        Arc::new(AnubisSource::new(client.clone())),
        Arc::new(HackerTargetSource::new(client.clone())),
        Arc::new(AlienVaultSource::new(client.clone())),
        Arc::new(UrlScanSource::new(client.clone())),
        Arc::new(WebArchiveSource::new(client.clone())),
        Arc::new(ThreatMinerSource::new(client.clone())),
        Arc::new(BufferOverSource::new(client.clone())),
        Arc::new(RapidDnsSource::new(client)),
    ]
}
