use super::SourceClient;
use async_trait::async_trait;
use std::collections::BTreeSet;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://api.hackertarget.com";

/// HackerTarget host search: `host,ip` CSV lines.
pub struct HackerTargetSource {
    client: SourceClient,
    base_url: String,
}

impl HackerTargetSource {
    pub const NAME: &'static str = "hackertarget";

    pub fn new(client: SourceClient) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Quota and error notices come back as 200 with a plain-text message.
fn parse_hostsearch(body: &str) -> Vec<String> {
    if body.contains("error") || body.contains("API count exceeded") {
        return Vec::new();
    }
    let hosts: BTreeSet<String> = body
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect();
    hosts.into_iter().collect()
}

#[async_trait]
impl SourceConnector for HackerTargetSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/hostsearch/?q={}", self.base_url, domain);
        self.client
            .text(Self::NAME, &url, &[], self.client.options(200, 1))
            .await
            .map(|body| parse_hostsearch(&body))
            .unwrap_or_default()
    }
}
