use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://api.certspotter.com";

#[derive(Debug, Deserialize)]
struct Issuance {
    #[serde(default)]
    dns_names: Vec<String>,
}

pub struct CertSpotterSource {
    client: SourceClient,
    base_url: String,
}

impl CertSpotterSource {
    pub const NAME: &'static str = "certspotter";

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
impl SourceConnector for CertSpotterSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!(
            "{}/v1/issuances?domain={}&include_subdomains=true&expand=dns_names",
            self.base_url, domain
        );
        let issuances: Vec<Issuance> = self
            .client
            .json(Self::NAME, &url, self.client.options(300, 1))
            .await
            .unwrap_or_default();

        issuances.into_iter().flat_map(|i| i.dns_names).collect()
    }
}
