use serde::{Deserialize, Serialize};

/// Outbound HTTP settings shared by every connector
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-attempt timeout (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Total attempts per request, including the first
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Concurrent requests allowed per remote host
    #[serde(default = "default_per_host_concurrency")]
    pub per_host_concurrency: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
            backoff_ms: default_backoff_ms(),
            per_host_concurrency: default_per_host_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_retries() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    200
}

fn default_per_host_concurrency() -> usize {
    10
}

fn default_user_agent() -> String {
    "domain-checker/1.0".to_string()
}
