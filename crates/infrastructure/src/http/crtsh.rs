use super::{FetchOptions, ResilientFetcher};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::{CertificateNames, CertificateSearch};
use subrecon_domain::DomainError;
use url::Url;

/// crt.sh full-text search (`?q=...&output=json`).
pub struct CrtShSearch {
    fetcher: Arc<ResilientFetcher>,
    base_url: String,
    options: FetchOptions,
}

impl CrtShSearch {
    pub fn new(fetcher: Arc<ResilientFetcher>, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            options: FetchOptions::new(1, Duration::from_millis(200), timeout),
        }
    }

    fn search_url(&self, query: &str) -> Result<String, DomainError> {
        Url::parse_with_params(&self.base_url, &[("q", query), ("output", "json")])
            .map(String::from)
            .map_err(|e| DomainError::InvalidInput(format!("bad search url: {}", e)))
    }
}

#[async_trait]
impl CertificateSearch for CrtShSearch {
    async fn search(&self, query: &str) -> Result<Vec<CertificateNames>, DomainError> {
        let url = self.search_url(query)?;
        let body = self.fetcher.get_text(&url, &[], self.options).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }
}
