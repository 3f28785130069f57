use crate::ports::{get_json, set_json, CacheStore, CertificateSearch, DnsLookup};
use crate::services::task_runner::TaskRunner;
use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::{
    extract_domains_from_text, is_valid_host, normalize_host, DomainError, RecordType,
};
use tracing::debug;

/// Hostnames found for one address and how long they may be cached.
struct LookupOutcome {
    hosts: Vec<String>,
    ttl: Option<Duration>,
}

/// PTR lookup with a certificate-transparency fallback.
pub struct ReverseLookupService {
    lookup: Arc<dyn DnsLookup>,
    certificates: Arc<dyn CertificateSearch>,
    cache: Arc<dyn CacheStore>,
    ptr_ttl: Duration,
    ct_ttl: Duration,
    result_ttl: Duration,
}

impl ReverseLookupService {
    pub fn new(
        lookup: Arc<dyn DnsLookup>,
        certificates: Arc<dyn CertificateSearch>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            lookup,
            certificates,
            cache,
            ptr_ttl: Duration::from_secs(5 * 60),
            ct_ttl: Duration::from_secs(24 * 60 * 60),
            result_ttl: Duration::from_secs(60 * 60),
        }
    }

    pub fn with_ttls(mut self, ptr_ttl: Duration, ct_ttl: Duration, result_ttl: Duration) -> Self {
        self.ptr_ttl = ptr_ttl;
        self.ct_ttl = ct_ttl;
        self.result_ttl = result_ttl;
        self
    }

    pub fn cache_key(ip: &IpAddr) -> String {
        format!("reverse:{}", ip)
    }

    /// Never fails; an address with no evidence maps to an empty list.
    pub async fn reverse_lookup(&self, ip: IpAddr, timeout: Duration) -> Vec<String> {
        let outcome = self.lookup_uncached(ip, timeout).await;
        if let Some(ttl) = outcome.ttl {
            set_json(self.cache.as_ref(), &Self::cache_key(&ip), &outcome.hosts, Some(ttl)).await;
        }
        outcome.hosts
    }

    async fn lookup_uncached(&self, ip: IpAddr, timeout: Duration) -> LookupOutcome {
        match self.ptr_names(ip, timeout).await {
            Ok(hosts) if !hosts.is_empty() => {
                return LookupOutcome {
                    hosts,
                    ttl: Some(self.ptr_ttl),
                };
            }
            Ok(_) => debug!(ip = %ip, "PTR lookup returned no valid names"),
            Err(e) => debug!(ip = %ip, error = %e, "PTR lookup failed, trying certificate search"),
        }

        match self.certificates.search(&ip.to_string()).await {
            Ok(records) => {
                let mut hosts = BTreeSet::new();
                for record in &records {
                    for field in [&record.common_name, &record.name_value].into_iter().flatten() {
                        hosts.extend(extract_domains_from_text(field));
                    }
                }
                LookupOutcome {
                    hosts: hosts.into_iter().collect(),
                    ttl: Some(self.ct_ttl),
                }
            }
            Err(e) => {
                debug!(ip = %ip, error = %e, "Certificate search fallback failed");
                LookupOutcome {
                    hosts: Vec::new(),
                    ttl: None,
                }
            }
        }
    }

    async fn ptr_names(&self, ip: IpAddr, timeout: Duration) -> Result<Vec<String>, DomainError> {
        let reverse_name = reverse_domain(&ip);
        let answer = tokio::time::timeout(
            timeout,
            self.lookup.query(&reverse_name, RecordType::PTR, None, timeout),
        )
        .await
        .map_err(|_| DomainError::TransportTimeout {
            target: reverse_name.clone(),
            timeout,
        })??;

        let mut seen = BTreeSet::new();
        Ok(answer
            .names
            .iter()
            .filter_map(|n| normalize_host(n).ok())
            .filter(|h| is_valid_host(h))
            .filter(|h| seen.insert(h.clone()))
            .collect())
    }

    /// Reverse-maps many addresses at bounded concurrency, consulting the cache first.
    pub async fn map_ips_to_domains(
        &self,
        ips: &[IpAddr],
        concurrency: usize,
        timeout: Duration,
    ) -> BTreeMap<IpAddr, Vec<String>> {
        let runner = TaskRunner::new(concurrency).with_retries(0);

        let tasks: Vec<_> = ips
            .iter()
            .map(|ip| {
                let ip = *ip;
                move || async move { Ok::<_, DomainError>((ip, self.cached_or_lookup(ip, timeout).await)) }
            })
            .collect();

        runner
            .run_all(tasks)
            .await
            .into_iter()
            .flatten()
            .map(|(ip, hosts)| {
                let unique: BTreeSet<String> = hosts.into_iter().collect();
                (ip, unique.into_iter().collect())
            })
            .collect()
    }

    async fn cached_or_lookup(&self, ip: IpAddr, timeout: Duration) -> Vec<String> {
        let key = Self::cache_key(&ip);
        if let Some(hosts) = get_json::<Vec<String>>(self.cache.as_ref(), &key).await {
            return hosts;
        }

        let outcome = self.lookup_uncached(ip, timeout).await;
        let ttl = outcome.ttl.unwrap_or(self.result_ttl);
        set_json(self.cache.as_ref(), &key, &outcome.hosts, Some(ttl)).await;
        outcome.hosts
    }
}

/// `in-addr.arpa` / `ip6.arpa` owner name for a PTR query.
pub fn reverse_domain(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            format!(
                "{}.{}.{}.{}.in-addr.arpa",
                octets[3], octets[2], octets[1], octets[0]
            )
        }
        IpAddr::V6(ipv6) => {
            let mut nibbles = Vec::with_capacity(32);
            for byte in ipv6.octets().iter().rev() {
                nibbles.push(format!("{:x}", byte & 0x0f));
                nibbles.push(format!("{:x}", (byte >> 4) & 0x0f));
            }
            format!("{}.ip6.arpa", nibbles.join("."))
        }
    }
}
