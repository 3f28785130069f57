//! Resolver layer: fallback resolution, zone transfer probing and wildcard detection.

use crate::ports::{DnsAnswer, DnsLookup};
use futures::future::join_all;
use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::{is_same_or_subdomain, DomainError, RecordType};
use tracing::debug;

const WILDCARD_PROBE_PREFIX: &str = "xzq-";
const WILDCARD_SAMPLE_PREFIX: &str = "xz-";
const RANDOM_LABEL_LEN: usize = 8;

/// A, AAAA and CNAME answers for one host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostDetails {
    pub a: Vec<IpAddr>,
    pub aaaa: Vec<IpAddr>,
    pub cnames: Vec<String>,
}

impl HostDetails {
    pub fn address_set(&self) -> BTreeSet<IpAddr> {
        self.a.iter().chain(self.aaaa.iter()).copied().collect()
    }
}

pub struct ResolverService {
    lookup: Arc<dyn DnsLookup>,
    public_resolvers: Vec<SocketAddr>,
    timeout: Duration,
    zone_transfer_max_ns: usize,
    wildcard_probes: usize,
}

impl ResolverService {
    pub fn new(lookup: Arc<dyn DnsLookup>, public_resolvers: Vec<SocketAddr>) -> Self {
        Self {
            lookup,
            public_resolvers,
            timeout: Duration::from_millis(3000),
            zone_transfer_max_ns: 3,
            wildcard_probes: 3,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_zone_transfer_max_ns(mut self, max: usize) -> Self {
        self.zone_transfer_max_ns = max;
        self
    }

    pub fn with_wildcard_probes(mut self, probes: usize) -> Self {
        self.wildcard_probes = probes.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One query bounded by `timeout`, whatever the adapter does internally.
    async fn query_bounded(
        &self,
        name: &str,
        record_type: RecordType,
        server: Option<SocketAddr>,
        timeout: Duration,
    ) -> Result<DnsAnswer, DomainError> {
        let target = server.map_or_else(|| "system".to_string(), |s| s.to_string());
        tokio::time::timeout(timeout, self.lookup.query(name, record_type, server, timeout))
            .await
            .map_err(|_| DomainError::TransportTimeout { target, timeout })?
    }

    /// System resolver first, then each public resolver in order. Never fails.
    pub async fn resolve_with_fallback(
        &self,
        host: &str,
        record_type: RecordType,
        timeout: Duration,
    ) -> Vec<IpAddr> {
        let servers = std::iter::once(None).chain(self.public_resolvers.iter().copied().map(Some));

        for server in servers {
            match self.query_bounded(host, record_type, server, timeout).await {
                Ok(answer) if !answer.addresses.is_empty() => {
                    return dedup_preserving_order(answer.addresses);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(
                        host = %host,
                        record_type = %record_type,
                        server = ?server,
                        error = %e,
                        "Resolution attempt failed"
                    );
                }
            }
        }

        Vec::new()
    }

    /// A first, AAAA when A is empty.
    pub async fn resolve_any_address(&self, host: &str) -> Vec<IpAddr> {
        let v4 = self
            .resolve_with_fallback(host, RecordType::A, self.timeout)
            .await;
        if !v4.is_empty() {
            return v4;
        }
        self.resolve_with_fallback(host, RecordType::AAAA, self.timeout)
            .await
    }

    /// A, AAAA and CNAME from the system resolver, each bounded independently.
    pub async fn resolve_host_details(&self, host: &str) -> HostDetails {
        let timeout = self.timeout;
        let (a, aaaa, cname) = tokio::join!(
            self.query_bounded(host, RecordType::A, None, timeout),
            self.query_bounded(host, RecordType::AAAA, None, timeout),
            self.query_bounded(host, RecordType::CNAME, None, timeout),
        );

        HostDetails {
            a: a.map(|r| r.addresses).unwrap_or_default(),
            aaaa: aaaa.map(|r| r.addresses).unwrap_or_default(),
            cnames: cname.map(|r| r.names).unwrap_or_default(),
        }
    }

    /// Asks the zone's own nameservers for everything they hold on `domain`.
    ///
    /// Refusal is the normal outcome and yields an empty list.
    pub async fn attempt_zone_transfer(&self, domain: &str) -> Vec<String> {
        let nameservers = match self
            .query_bounded(domain, RecordType::NS, None, self.timeout)
            .await
        {
            Ok(answer) => answer.names,
            Err(e) => {
                debug!(domain = %domain, error = %e, "Zone transfer: NS lookup failed");
                return Vec::new();
            }
        };

        let attempts = nameservers
            .iter()
            .take(self.zone_transfer_max_ns)
            .map(|ns| self.query_nameserver(domain, ns));

        let mut found = BTreeSet::new();
        for names in join_all(attempts).await {
            found.extend(names);
        }
        found.into_iter().collect()
    }

    async fn query_nameserver(&self, domain: &str, nameserver: &str) -> Vec<String> {
        let Some(ip) = self
            .resolve_with_fallback(nameserver, RecordType::A, self.timeout)
            .await
            .into_iter()
            .next()
        else {
            return Vec::new();
        };

        let server = SocketAddr::new(ip, 53);
        match self
            .query_bounded(domain, RecordType::ANY, Some(server), self.timeout)
            .await
        {
            Ok(answer) => answer
                .names
                .into_iter()
                .map(|n| n.trim_end_matches('.').to_lowercase())
                .filter(|n| is_same_or_subdomain(n, domain))
                .collect(),
            Err(e) => {
                debug!(
                    domain = %domain,
                    nameserver = %nameserver,
                    error = %e,
                    "Zone transfer refused or failed"
                );
                Vec::new()
            }
        }
    }

    /// True only when every random probe resolves to the same non-empty address set.
    pub async fn detect_wildcard(&self, domain: &str) -> bool {
        let probes: Vec<String> = (0..self.wildcard_probes)
            .map(|_| format!("{}.{}", random_label(WILDCARD_PROBE_PREFIX), domain))
            .collect();

        let sets: Vec<BTreeSet<IpAddr>> = join_all(probes.iter().map(|h| self.resolve_host_details(h)))
            .await
            .iter()
            .map(HostDetails::address_set)
            .collect();

        let wildcard = is_uniform_wildcard(&sets);
        debug!(domain = %domain, wildcard = wildcard, "Wildcard probe finished");
        wildcard
    }

    /// Address set a wildcard zone hands out, sampled from one more random label.
    pub async fn wildcard_ips(&self, domain: &str) -> BTreeSet<IpAddr> {
        let host = format!("{}.{}", random_label(WILDCARD_SAMPLE_PREFIX), domain);
        self.resolve_host_details(&host).await.address_set()
    }
}

/// All sets empty: no wildcard. Otherwise every set must be non-empty and identical.
pub fn is_uniform_wildcard(sets: &[BTreeSet<IpAddr>]) -> bool {
    let Some(first) = sets.first() else {
        return false;
    };
    if sets.iter().all(BTreeSet::is_empty) {
        return false;
    }
    !first.is_empty() && sets.iter().all(|s| s == first)
}

fn random_label(prefix: &str) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let suffix: String = (0..RANDOM_LABEL_LEN)
        .map(|_| ALPHABET[fastrand::usize(..ALPHABET.len())] as char)
        .collect();
    format!("{}{}", prefix, suffix)
}

fn dedup_preserving_order(addresses: Vec<IpAddr>) -> Vec<IpAddr> {
    let mut seen = BTreeSet::new();
    addresses.into_iter().filter(|ip| seen.insert(*ip)).collect()
}
