//! subrecon domain layer
pub mod cidr;
pub mod config;
pub mod errors;
pub mod host;
pub mod record_type;
pub mod score;
pub mod subdomain_entry;
pub mod text_extract;

pub use cidr::{ipv4_to_int, is_in_ranges, parse_cidr, AntifilterLists, CidrRange};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use host::{is_same_or_subdomain, is_valid_host, normalize_host};
pub use record_type::RecordType;
pub use score::{classify, compute_score, Confidence, ScoreWeights, SourceWeights};
pub use subdomain_entry::{merge, SourceRecord, SubdomainEntry};
pub use text_extract::{extract_domains_from_text, extract_ips_from_text};
