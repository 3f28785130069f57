//! # subrecon
//!
//! Subdomain discovery and reverse-DNS enrichment from the command line.
//! Reports are printed to stdout as JSON.

mod bootstrap;
mod di;

use anyhow::Context;
use bootstrap::{init_logging, load_config, load_wordlist};
use clap::{Parser, Subcommand};
use di::{Adapters, Services, UseCases};
use serde::Serialize;
use std::sync::Arc;
use subrecon_application::use_cases::ScanRequest;
use subrecon_domain::CliOverrides;
use subrecon_jobs::{AntifilterRefreshJob, BucketSweepJob, JobRunner};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "subrecon")]
#[command(version)]
#[command(about = "Subdomain recon and reverse-DNS enrichment")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Redis URL for the shared cache and rate limiter
    #[arg(long)]
    redis_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Parallel tasks for brute force and reverse lookups
    #[arg(long)]
    concurrency: Option<usize>,

    #[arg(long)]
    dns_timeout_ms: Option<u64>,

    #[arg(long)]
    http_timeout_ms: Option<u64>,

    /// Identity charged against the rate limiter
    #[arg(long, default_value = "cli")]
    client: String,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate subdomains of a domain
    Scan {
        domain: String,

        /// Brute-force wordlist, one label per line
        #[arg(short, long)]
        wordlist: Option<String>,
    },
    /// Map IP addresses to hostnames
    Reverse {
        ips: Vec<String>,

        /// Text file with one IP per line or `route add` lines
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Check a host and its addresses against the antifilter lists
    Antifilter { host: String, ips: Vec<String> },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let wordlist = match &self.command {
            Command::Scan { wordlist, .. } => wordlist.clone(),
            _ => None,
        };
        CliOverrides {
            redis_url: self.redis_url.clone(),
            log_level: self.log_level.clone(),
            concurrency: self.concurrency,
            dns_timeout_ms: self.dns_timeout_ms,
            http_timeout_ms: self.http_timeout_ms,
            wordlist,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.overrides())?;
    init_logging(&config);

    let adapters = Adapters::new(&config).await;
    let services = Services::new(&config, &adapters);
    let use_cases = UseCases::new(&config, &adapters, &services);

    let shutdown = JobRunner::new()
        .with_bucket_sweep(
            BucketSweepJob::new(adapters.rate_limiter.clone())
                .with_interval(config.rate_limit.sweep_interval_secs),
        )
        .with_antifilter_refresh(
            AntifilterRefreshJob::new(Arc::clone(&services.antifilter))
                .with_interval(config.antifilter.refresh_interval_secs),
        )
        .start()
        .await;

    let result = match cli.command {
        Command::Scan { domain, .. } => {
            let wordlist = load_wordlist(config.scan.wordlist.as_deref())?;
            info!(domain = %domain, words = wordlist.len(), "Starting scan");
            let report = use_cases
                .scan
                .execute(ScanRequest {
                    client: cli.client.clone(),
                    domain,
                    wordlist,
                })
                .await?;
            emit(&report, cli.pretty)
        }
        Command::Reverse { ips, file } => {
            let report = match file {
                Some(path) => {
                    let mut text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path))?;
                    for ip in &ips {
                        text.push('\n');
                        text.push_str(ip);
                    }
                    use_cases.map_ips.execute_text(&cli.client, &text).await?
                }
                None => use_cases.map_ips.execute(&cli.client, &ips).await?,
            };
            emit(&report, cli.pretty)
        }
        Command::Antifilter { host, ips } => {
            let verdict = use_cases.check_antifilter.execute(&host, &ips).await?;
            emit(&verdict, cli.pretty)
        }
    };

    shutdown.cancel();
    result
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
