use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://otx.alienvault.com";

#[derive(Debug, Default, Deserialize)]
struct PassiveDns {
    #[serde(default)]
    passive_dns: Option<Vec<Row>>,
    #[serde(default)]
    data: Option<Vec<Row>>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    hostname: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

/// AlienVault OTX passive DNS.
pub struct AlienVaultSource {
    client: SourceClient,
    base_url: String,
}

impl AlienVaultSource {
    pub const NAME: &'static str = "alienvault";

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
impl SourceConnector for AlienVaultSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!(
            "{}/api/v1/indicators/domain/{}/passive_dns",
            self.base_url, domain
        );
        let body: PassiveDns = self
            .client
            .json(Self::NAME, &url, self.client.options(200, 1))
            .await
            .unwrap_or_default();

        body.passive_dns
            .or(body.data)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|r| [r.hostname, r.address])
            .flatten()
            .collect()
    }
}
