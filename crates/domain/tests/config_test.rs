use std::collections::HashMap;
use std::io::Write;
use subrecon_domain::{CliOverrides, Config, ConfigError};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn test_defaults_are_valid() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.cache.capacity, 5000);
    assert_eq!(config.cache.key_prefix, "v1:");
    assert_eq!(config.rate_limit.limit, 500);
    assert_eq!(config.rate_limit.window_ms, 60_000);
    assert_eq!(config.dns.timeout_ms, 3000);
    assert_eq!(config.http.timeout_ms, 5000);
    assert_eq!(config.dns.public_resolvers.len(), 6);
    assert_eq!(config.scoring.weights.total(), 100.0);
}

#[test]
fn test_load_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[cache]
capacity = 100

[dns]
timeout_ms = 1500
public_resolvers = ["9.9.9.9:53"]

[scoring.weights]
source = 50.0

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = Config::load(file.path().to_str(), CliOverrides::default()).unwrap();

    assert_eq!(config.cache.capacity, 100);
    assert_eq!(config.dns.timeout_ms, 1500);
    assert_eq!(config.dns.public_resolvers, vec!["9.9.9.9:53".to_string()]);
    assert_eq!(config.scoring.weights.source, 50.0);
    assert_eq!(config.scoring.weights.dns, 25.0);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_file_is_an_error() {
    let result = Config::load(Some("/nonexistent/subrecon.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead { .. })));
}

#[test]
fn test_env_overrides() {
    let mut config = Config::default();
    config
        .apply_env(env(&[
            ("REDIS_URL", "redis://127.0.0.1:6379"),
            ("DNS_TIMEOUT_MS", "1200"),
            ("CONCURRENCY_DEFAULT", "4"),
            ("CACHE_KEY_PREFIX", "v2:"),
        ]))
        .unwrap();

    assert_eq!(config.cache.redis_url.as_deref(), Some("redis://127.0.0.1:6379"));
    assert_eq!(config.dns.timeout_ms, 1200);
    assert_eq!(config.scan.concurrency, 4);
    assert_eq!(config.cache.key_prefix, "v2:");
}

#[test]
fn test_env_rejects_garbage_numbers() {
    let mut config = Config::default();
    let result = config.apply_env(env(&[("HTTP_TIMEOUT_MS", "soon")]));
    assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
}

#[test]
fn test_cli_overrides_win() {
    let mut config = Config::default();
    config.apply_env(env(&[("DNS_TIMEOUT_MS", "1200")])).unwrap();
    config.apply_cli(CliOverrides {
        dns_timeout_ms: Some(800),
        concurrency: Some(2),
        ..Default::default()
    });

    assert_eq!(config.dns.timeout_ms, 800);
    assert_eq!(config.scan.concurrency, 2);
}

#[test]
fn test_validate_rejects_zero_concurrency() {
    let mut config = Config::default();
    config.scan.concurrency = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_negative_weight() {
    let mut config = Config::default();
    config.scoring.weights.penalty = -1.0;
    assert!(config.validate().is_err());
}
