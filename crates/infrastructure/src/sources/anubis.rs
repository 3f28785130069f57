use super::SourceClient;
use async_trait::async_trait;
use serde_json::Value;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://jldc.me";

/// Anubis: a bare JSON array of names.
pub struct AnubisSource {
    client: SourceClient,
    base_url: String,
}

impl AnubisSource {
    pub const NAME: &'static str = "anubis";

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
impl SourceConnector for AnubisSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/anubis/subdomains/{}", self.base_url, domain);
        let items: Vec<Value> = self
            .client
            .json(Self::NAME, &url, self.client.options(300, 1))
            .await
            .unwrap_or_default();

        items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}
