pub mod cache_store;
pub mod certificate_search;
pub mod dns_lookup;
pub mod rate_limiter;
pub mod remote_list;
pub mod source_connector;

pub use cache_store::{get_json, set_json, CacheStore};
pub use certificate_search::{CertificateNames, CertificateSearch};
pub use dns_lookup::{DnsAnswer, DnsLookup};
pub use rate_limiter::RateLimiter;
pub use remote_list::RemoteListSource;
pub use source_connector::SourceConnector;
