use super::SourceClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use subrecon_application::ports::SourceConnector;

const DEFAULT_BASE: &str = "https://api.threatminer.org";

#[derive(Debug, Default, Deserialize)]
struct ThreatMinerResponse {
    #[serde(default)]
    status_code: Value,
    #[serde(default)]
    results: Vec<Value>,
}

impl ThreatMinerResponse {
    /// The API reports its status as either `"200"` or `200`.
    fn is_ok(&self) -> bool {
        match &self.status_code {
            Value::String(s) => s == "200",
            Value::Number(n) => n.as_u64() == Some(200),
            _ => false,
        }
    }
}

pub struct ThreatMinerSource {
    client: SourceClient,
    base_url: String,
}

impl ThreatMinerSource {
    pub const NAME: &'static str = "threatminer";

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

fn names_from(response: ThreatMinerResponse) -> Vec<String> {
    if !response.is_ok() {
        return Vec::new();
    }
    response
        .results
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("domain")
                .or_else(|| map.get("hostname"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .collect()
}

#[async_trait]
impl SourceConnector for ThreatMinerSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn fetch_names(&self, domain: &str) -> Vec<String> {
        let url = format!("{}/v2/domain.php?q={}&rt=5", self.base_url, domain);
        self.client
            .json::<ThreatMinerResponse>(Self::NAME, &url, self.client.options(500, 1))
            .await
            .map(names_from)
            .unwrap_or_default()
    }
}
