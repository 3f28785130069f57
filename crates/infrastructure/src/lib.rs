pub mod cache;
pub mod dns;
pub mod http;
pub mod rate_limit;
pub mod sources;
