//! Configuration module for subrecon
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration, environment and CLI overrides
//! - `cache`: Result cache backends and TTLs
//! - `rate_limit`: Admission control
//! - `dns`: Resolver settings
//! - `http`: Outbound HTTP settings
//! - `recon`: Scan and reverse lookup tuning
//! - `antifilter`: Block-list sources
//! - `scoring`: Confidence score weights
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod antifilter;
pub mod cache;
pub mod dns;
pub mod errors;
pub mod http;
pub mod logging;
pub mod rate_limit;
pub mod recon;
pub mod root;
pub mod scoring;

pub use antifilter::AntifilterConfig;
pub use cache::CacheConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use http::HttpConfig;
pub use logging::LoggingConfig;
pub use rate_limit::RateLimitConfig;
pub use recon::{ReverseConfig, ScanConfig};
pub use root::{CliOverrides, Config};
pub use scoring::ScoringConfig;
