use serde::{Deserialize, Serialize};

/// Result cache settings.
///
/// When `redis_url` is set the shared backend is tried first; any failure to
/// reach it falls back to the in-process LRU.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Prefix applied to every key in the shared backend
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Maximum entries held by the in-process LRU
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// TTL applied when a caller does not pass one (ms)
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,

    /// TTL for resolved A records (ms)
    #[serde(default = "default_a_record_ttl_ms")]
    pub a_record_ttl_ms: u64,

    /// TTL for aggregated scan results (ms)
    #[serde(default = "default_aggregated_ttl_ms")]
    pub aggregated_ttl_ms: u64,

    /// How long to wait for the shared backend to answer PING on startup (ms)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: default_key_prefix(),
            capacity: default_capacity(),
            default_ttl_ms: default_ttl_ms(),
            a_record_ttl_ms: default_a_record_ttl_ms(),
            aggregated_ttl_ms: default_aggregated_ttl_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_key_prefix() -> String {
    "v1:".to_string()
}

fn default_capacity() -> usize {
    5000
}

fn default_ttl_ms() -> u64 {
    60 * 60 * 1000
}

fn default_a_record_ttl_ms() -> u64 {
    10 * 60 * 1000
}

fn default_aggregated_ttl_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}
