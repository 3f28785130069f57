use serde::{Deserialize, Serialize};

/// DNS resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Per-query timeout (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Resolvers tried first; when empty, nameservers from /etc/resolv.conf are used
    #[serde(default)]
    pub system_servers: Vec<String>,

    /// Ordered public resolvers tried when the system resolver has no answer
    #[serde(default = "default_public_resolvers")]
    pub public_resolvers: Vec<String>,

    /// Nameservers contacted during a zone transfer attempt
    #[serde(default = "default_zone_transfer_max_ns")]
    pub zone_transfer_max_ns: usize,

    /// Random labels probed by the wildcard detector
    #[serde(default = "default_wildcard_probes")]
    pub wildcard_probes: usize,

    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            system_servers: Vec::new(),
            public_resolvers: default_public_resolvers(),
            zone_transfer_max_ns: default_zone_transfer_max_ns(),
            wildcard_probes: default_wildcard_probes(),
            resolv_conf: default_resolv_conf(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_public_resolvers() -> Vec<String> {
    [
        "8.8.8.8:53",
        "8.8.4.4:53",
        "1.1.1.1:53",
        "1.0.0.1:53",
        "9.9.9.9:53",
        "149.112.112.112:53",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_zone_transfer_max_ns() -> usize {
    3
}

fn default_wildcard_probes() -> usize {
    3
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}
