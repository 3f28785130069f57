use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://tls.bufferover.run";

#[derive(Debug, Default, Deserialize)]
struct BufferOverResponse {
    #[serde(rename = "Results", default)]
    results: Option<Vec<Value>>,
    #[serde(rename = "FDNS_A", default)]
    fdns_a: Option<Vec<Value>>,
}

/// BufferOver TLS scan data: `ip,hostname` strings.
pub struct BufferOverSource {
    client: SourceClient,
    base_url: String,
}

impl BufferOverSource {
    pub const NAME: &'static str = "bufferover";

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
impl SourceConnector for BufferOverSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/dns?q=.{}", self.base_url, domain);
        let body: BufferOverResponse = self
            .client
            .json(Self::NAME, &url, self.client.options(300, 1))
            .await
            .unwrap_or_default();

        body.results
            .or(body.fdns_a)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|line| line.split(',').nth(1))
            .map(|host| host.trim().to_string())
            .collect()
    }
}
