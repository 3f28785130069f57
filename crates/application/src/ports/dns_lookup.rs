use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use subrecon_domain::{DomainError, RecordType};

/// Answer section of a single DNS query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsAnswer {
    pub addresses: Vec<IpAddr>,
    /// Name-valued record data (CNAME, NS, PTR, MX, SRV, SOA), trailing dot removed.
    pub names: Vec<String>,
}

impl DnsAnswer {
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.names.is_empty()
    }
}

#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// Sends one query. `server = None` uses the system resolver.
    ///
    /// NXDOMAIN and NODATA come back as an empty answer, not an error.
    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
        server: Option<SocketAddr>,
        timeout: Duration,
    ) -> Result<DnsAnswer, DomainError>;
}
