use super::SourceClient;
use async_trait::async_trait;
use fancy_regex::Regex;
use std::sync::LazyLock;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://rapiddns.io";

static TABLE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<td>([a-z0-9._-]+\.[a-z]{2,})</td>").expect("table cell pattern")
});

/// RapidDNS: scraped from the HTML result table.
pub struct RapidDnsSource {
    client: SourceClient,
    base_url: String,
}

impl RapidDnsSource {
    pub const NAME: &'static str = "rapiddns";

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

fn cells(html: &str) -> Vec<String> {
    TABLE_CELL
        .captures_iter(html)
        .filter_map(Result::ok)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_lowercase()))
        .collect()
}

#[async_trait]
impl SourceConnector for RapidDnsSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/subdomain/{}?full=1", self.base_url, domain);
        let headers = [
            ("user-agent", "Mozilla/5.0 (compatible; domain-checker/1.0)"),
            ("accept", "text/html"),
        ];
        self.client
            .text(Self::NAME, &url, &headers, self.client.options(300, 2))
            .await
            .map(|html| cells(&html))
            .unwrap_or_default()
    }
}
