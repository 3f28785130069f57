use serde::{Deserialize, Serialize};

/// Subdomain scan settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Extra attempts per brute-force candidate
    #[serde(default = "default_bruteforce_retries")]
    pub bruteforce_retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Optional wordlist file, one label per line
    #[serde(default)]
    pub wordlist: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            bruteforce_retries: default_bruteforce_retries(),
            backoff_ms: default_backoff_ms(),
            wordlist: None,
        }
    }
}

/// Reverse lookup settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReverseConfig {
    #[serde(default = "default_reverse_concurrency")]
    pub concurrency: usize,

    /// TTL for hostnames found via PTR (ms)
    #[serde(default = "default_ptr_ttl_ms")]
    pub ptr_ttl_ms: u64,

    /// TTL for hostnames found via certificate transparency (ms)
    #[serde(default = "default_ct_ttl_ms")]
    pub ct_ttl_ms: u64,

    /// TTL for bulk mapping results (ms)
    #[serde(default = "default_result_ttl_ms")]
    pub result_ttl_ms: u64,

    #[serde(default = "default_ct_search_url")]
    pub ct_search_url: String,

    /// Upper bound on addresses processed per request
    #[serde(default = "default_max_ips")]
    pub max_ips: usize,
}

impl Default for ReverseConfig {
    fn default() -> Self {
        Self {
            concurrency: default_reverse_concurrency(),
            ptr_ttl_ms: default_ptr_ttl_ms(),
            ct_ttl_ms: default_ct_ttl_ms(),
            result_ttl_ms: default_result_ttl_ms(),
            ct_search_url: default_ct_search_url(),
            max_ips: default_max_ips(),
        }
    }
}

fn default_concurrency() -> usize {
    10
}

fn default_bruteforce_retries() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    200
}

fn default_reverse_concurrency() -> usize {
    20
}

fn default_ptr_ttl_ms() -> u64 {
    5 * 60 * 1000
}

fn default_ct_ttl_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_result_ttl_ms() -> u64 {
    60 * 60 * 1000
}

fn default_ct_search_url() -> String {
    "https://crt.sh/".to_string()
}

fn default_max_ips() -> usize {
    100
}
