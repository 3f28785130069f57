use serde::{Deserialize, Serialize};

/// Community block-list sources
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AntifilterConfig {
    #[serde(default = "default_domains_url")]
    pub domains_url: String,

    #[serde(default = "default_ips_url")]
    pub ips_url: String,

    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Background refresh interval (seconds)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for AntifilterConfig {
    fn default() -> Self {
        Self {
            domains_url: default_domains_url(),
            ips_url: default_ips_url(),
            cache_ttl_ms: default_cache_ttl_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

fn default_domains_url() -> String {
    "https://community.antifilter.download/list/domains.lst".to_string()
}

fn default_ips_url() -> String {
    "https://antifilter.download/list/allyouneed.lst".to_string()
}

fn default_cache_ttl_ms() -> u64 {
    6 * 60 * 60 * 1000
}

fn default_refresh_interval_secs() -> u64 {
    6 * 60 * 60
}
