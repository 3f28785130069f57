use super::{
    AntifilterConfig, CacheConfig, ConfigError, DnsConfig, HttpConfig, LoggingConfig,
    RateLimitConfig, ReverseConfig, ScanConfig, ScoringConfig,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub dns: DnsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub reverse: ReverseConfig,
    #[serde(default)]
    pub antifilter: AntifilterConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values passed on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub redis_url: Option<String>,
    pub log_level: Option<String>,
    pub concurrency: Option<usize>,
    pub dns_timeout_ms: Option<u64>,
    pub http_timeout_ms: Option<u64>,
    pub wordlist: Option<String>,
}

impl Config {
    /// Loads defaults, then the optional TOML file, then environment, then CLI overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|source| ConfigError::FileRead {
                    path: p.to_string(),
                    source,
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.apply_cli(overrides);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies environment overrides through `lookup` so tests can inject values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("REDIS_URL").filter(|u| !u.trim().is_empty()) {
            self.cache.redis_url = Some(url);
        }
        if let Some(prefix) = lookup("CACHE_KEY_PREFIX") {
            self.cache.key_prefix = prefix;
        }
        if let Some(v) = parse_env(&lookup, "HTTP_TIMEOUT_MS")? {
            self.http.timeout_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "DNS_TIMEOUT_MS")? {
            self.dns.timeout_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "PTR_TTL_MS")? {
            self.reverse.ptr_ttl_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "A_RECORD_TTL_MS")? {
            self.cache.a_record_ttl_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "AGGREGATED_TTL_MS")? {
            self.cache.aggregated_ttl_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "CONCURRENCY_DEFAULT")? {
            self.scan.concurrency = v;
            self.http.per_host_concurrency = v;
        }
        if let Some(url) = lookup("ANTIFILTER_DOMAINS_URL") {
            self.antifilter.domains_url = url;
        }
        if let Some(url) = lookup("ANTIFILTER_IPS_URL") {
            self.antifilter.ips_url = url;
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.redis_url {
            self.cache.redis_url = Some(url);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(c) = overrides.concurrency {
            self.scan.concurrency = c;
        }
        if let Some(t) = overrides.dns_timeout_ms {
            self.dns.timeout_ms = t;
        }
        if let Some(t) = overrides.http_timeout_ms {
            self.http.timeout_ms = t;
        }
        if let Some(w) = overrides.wordlist {
            self.scan.wordlist = Some(w);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.concurrency == 0 || self.reverse.concurrency == 0 {
            return Err(ConfigError::Validation(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.http.per_host_concurrency == 0 {
            return Err(ConfigError::Validation(
                "http.per_host_concurrency must be at least 1".to_string(),
            ));
        }
        if self.http.retries == 0 {
            return Err(ConfigError::Validation(
                "http.retries counts total attempts and must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.limit == 0 || self.rate_limit.window_ms == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.limit and rate_limit.window_ms must be positive".to_string(),
            ));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Validation(
                "cache.capacity must be positive".to_string(),
            ));
        }
        if self.dns.timeout_ms == 0 || self.http.timeout_ms == 0 {
            return Err(ConfigError::Validation("timeouts must be positive".to_string()));
        }
        if self.dns.wildcard_probes == 0 {
            return Err(ConfigError::Validation(
                "dns.wildcard_probes must be at least 1".to_string(),
            ));
        }

        let w = &self.scoring.weights;
        let all = [w.source, w.frequency, w.dns, w.ptr, w.penalty];
        if all.iter().any(|v| !v.is_finite() || *v < 0.0) || w.total() <= 0.0 {
            return Err(ConfigError::Validation(
                "scoring weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if self.scoring.sources.max_weight <= 0.0 || self.scoring.sources.saturation == 0 {
            return Err(ConfigError::Validation(
                "scoring.sources.max_weight and saturation must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value: raw,
            }),
    }
}
