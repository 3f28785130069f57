use crate::ports::RateLimiter;
use crate::services::ReverseLookupService;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::{extract_ips_from_text, DomainError};
use tracing::{info, instrument, warn};

const RATE_BUCKET: &str = "reverse";

#[derive(Debug, Clone)]
pub struct ReverseSettings {
    pub concurrency: usize,
    pub timeout: Duration,
    pub max_ips: usize,
    pub rate_limit: u32,
    pub rate_window: Duration,
}

impl Default for ReverseSettings {
    fn default() -> Self {
        Self {
            concurrency: 20,
            timeout: Duration::from_millis(3000),
            max_ips: 100,
            rate_limit: 500,
            rate_window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseResult {
    pub ip: String,
    pub hostnames: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseReport {
    pub results: Vec<ReverseResult>,
    pub total: usize,
    pub resolved: usize,
    /// Inputs that were not IP addresses.
    pub skipped: Vec<String>,
}

pub struct MapIpsToDomainsUseCase {
    reverse: Arc<ReverseLookupService>,
    rate_limiter: Arc<dyn RateLimiter>,
    settings: ReverseSettings,
}

impl MapIpsToDomainsUseCase {
    pub fn new(reverse: Arc<ReverseLookupService>, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            reverse,
            rate_limiter,
            settings: ReverseSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ReverseSettings) -> Self {
        self.settings = settings;
        self
    }

    #[instrument(skip(self, inputs), fields(inputs = inputs.len()))]
    pub async fn execute(&self, client: &str, inputs: &[String]) -> Result<ReverseReport, DomainError> {
        if !self
            .rate_limiter
            .allow(client, RATE_BUCKET, self.settings.rate_limit, self.settings.rate_window)
            .await
        {
            return Err(DomainError::RateLimited {
                client: client.to_string(),
                bucket: RATE_BUCKET.to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut ips = Vec::new();
        let mut skipped = Vec::new();
        for raw in inputs {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match raw.parse::<IpAddr>() {
                Ok(ip) => {
                    if seen.insert(ip) {
                        ips.push(ip);
                    }
                }
                Err(_) => skipped.push(raw.to_string()),
            }
        }

        if ips.is_empty() {
            return Err(DomainError::InvalidInput(
                "no valid IP addresses supplied".to_string(),
            ));
        }
        if ips.len() > self.settings.max_ips {
            warn!(
                supplied = ips.len(),
                max = self.settings.max_ips,
                "Too many addresses, truncating"
            );
            ips.truncate(self.settings.max_ips);
        }

        let mapped = self
            .reverse
            .map_ips_to_domains(&ips, self.settings.concurrency, self.settings.timeout)
            .await;

        let results: Vec<ReverseResult> = ips
            .iter()
            .map(|ip| ReverseResult {
                ip: ip.to_string(),
                hostnames: mapped.get(ip).cloned().unwrap_or_default(),
            })
            .collect();
        let resolved = results.iter().filter(|r| !r.hostnames.is_empty()).count();

        info!(total = results.len(), resolved, "Reverse mapping finished");

        Ok(ReverseReport {
            total: results.len(),
            resolved,
            skipped,
            results,
        })
    }

    /// Same as [`execute`](Self::execute), pulling addresses out of free text or `route add` dumps.
    pub async fn execute_text(&self, client: &str, text: &str) -> Result<ReverseReport, DomainError> {
        let ips = extract_ips_from_text(text);
        self.execute(client, &ips).await
    }
}
