use subrecon_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        cache = if config.cache.redis_url.is_some() { "redis" } else { "memory" },
        concurrency = config.scan.concurrency,
        dns_timeout_ms = config.dns.timeout_ms,
        http_timeout_ms = config.http.timeout_ms,
        "Configuration loaded"
    );

    Ok(config)
}
