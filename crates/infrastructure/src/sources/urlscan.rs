use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://urlscan.io";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ScanResult>,
}

#[derive(Debug, Deserialize)]
struct ScanResult {
    #[serde(default)]
    page: Option<Page>,
    #[serde(default)]
    task: Option<Task>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    host: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Task {
    #[serde(default)]
    domain: Option<String>,
}

pub struct UrlScanSource {
    client: SourceClient,
    base_url: String,
}

impl UrlScanSource {
    pub const NAME: &'static str = "urlscan";

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

#[async_trait]
impl SourceConnector for UrlScanSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/api/v1/search/?q=domain:{}", self.base_url, domain);
        let body: SearchResponse = self
            .client
            .json(Self::NAME, &url, self.client.options(200, 1))
            .await
            .unwrap_or_default();

        body.results
            .into_iter()
            .filter_map(|r| {
                let (page_domain, page_host) = r
                    .page
                    .map(|p| (p.domain, p.host))
                    .unwrap_or((None, None));
                page_domain
                    .or(page_host)
                    .or_else(|| r.task.and_then(|t| t.domain))
            })
            .collect()
    }
}
