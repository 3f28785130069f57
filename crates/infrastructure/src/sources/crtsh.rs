use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://crt.sh";

#[derive(Debug, Deserialize)]
struct CrtShRow {
    #[serde(default)]
    name_value: Option<String>,
    #[serde(default)]
    common_name: Option<String>,
}

/// Certificate transparency search for `%.domain`.
pub struct CrtShSource {
    client: SourceClient,
    base_url: String,
}

impl CrtShSource {
    pub const NAME: &'static str = "crtsh";

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
impl SourceConnector for CrtShSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/?q=%25.{}&output=json", self.base_url, domain);
        let rows: Vec<CrtShRow> = self
            .client
            .json(Self::NAME, &url, self.client.options(500, 2))
            .await
            .unwrap_or_default();

        rows.into_iter()
            .filter_map(|r| r.name_value.or(r.common_name))
            .flat_map(|v| {
                v.split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
