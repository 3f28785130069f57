use super::SourceClient;
use async_trait::async_trait;
use serde_json::Value;
use subrecon_application::ports::SourceConnector;
use url::Url;

const DEFAULT_BASE: &str = "https://web.archive.org";

/// Wayback Machine CDX index: hosts of archived URLs.
pub struct WebArchiveSource {
    client: SourceClient,
    base_url: String,
}

impl WebArchiveSource {
    pub const NAME: &'static str = "webarchive";

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

/// First row is the `["original"]` header.
fn hosts_from_rows(rows: Vec<Value>) -> Vec<String> {
    rows.into_iter()
        .skip(1)
        .filter_map(|row| match row {
            Value::Array(cols) => cols.into_iter().next().and_then(|c| c.as_str().map(str::to_string)),
            Value::String(s) => Some(s),
            _ => None,
        })
        .filter_map(|u| Url::parse(&u).ok()?.host_str().map(str::to_string))
        .collect()
}

#[async_trait]
impl SourceConnector for WebArchiveSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!(
            "{}/cdx/search/cdx?url=*.{}/*&output=json&fl=original&collapse=urlkey&limit=10000",
            self.base_url, domain
        );
        let rows: Vec<Value> = self
            .client
            .json(Self::NAME, &url, self.client.options(300, 2))
            .await
            .unwrap_or_default();
        hosts_from_rows(rows)
    }
}
