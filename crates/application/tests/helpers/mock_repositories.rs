#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::{
    CacheStore, CertificateNames, CertificateSearch, DnsAnswer, DnsLookup, RateLimiter,
    RemoteListSource, SourceConnector,
};
use subrecon_domain::{DomainError, RecordType};
use tokio::sync::RwLock;

// ============================================================================
// Mock DnsLookup
// ============================================================================

#[derive(Clone, Default)]
pub struct MockDnsLookup {
    answers: Arc<RwLock<HashMap<(String, RecordType), DnsAnswer>>>,
    server_answers: Arc<RwLock<HashMap<(String, RecordType, SocketAddr), DnsAnswer>>>,
    wildcards: Arc<RwLock<HashMap<String, Vec<IpAddr>>>>,
    failing: Arc<RwLock<HashSet<String>>>,
    calls: Arc<RwLock<Vec<(String, RecordType, Option<SocketAddr>)>>>,
}

impl MockDnsLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_addresses(&self, name: &str, record_type: RecordType, ips: &[&str]) {
        let answer = DnsAnswer {
            addresses: ips.iter().map(|ip| ip.parse().unwrap()).collect(),
            names: vec![],
        };
        self.answers
            .write()
            .await
            .insert((name.to_string(), record_type), answer);
    }

    pub async fn set_names(&self, name: &str, record_type: RecordType, names: &[&str]) {
        let answer = DnsAnswer {
            addresses: vec![],
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        self.answers
            .write()
            .await
            .insert((name.to_string(), record_type), answer);
    }

    /// Answer only when the query is sent to `server`.
    pub async fn set_server_names(
        &self,
        name: &str,
        record_type: RecordType,
        server: SocketAddr,
        names: &[&str],
    ) {
        let answer = DnsAnswer {
            addresses: vec![],
            names: names.iter().map(|n| n.to_string()).collect(),
        };
        self.server_answers
            .write()
            .await
            .insert((name.to_string(), record_type, server), answer);
    }

    pub async fn set_server_addresses(
        &self,
        name: &str,
        record_type: RecordType,
        server: SocketAddr,
        ips: &[&str],
    ) {
        let answer = DnsAnswer {
            addresses: ips.iter().map(|ip| ip.parse().unwrap()).collect(),
            names: vec![],
        };
        self.server_answers
            .write()
            .await
            .insert((name.to_string(), record_type, server), answer);
    }

    /// Any otherwise unknown name under `domain` answers A with `ips`.
    pub async fn set_wildcard(&self, domain: &str, ips: &[&str]) {
        self.wildcards.write().await.insert(
            domain.to_string(),
            ips.iter().map(|ip| ip.parse().unwrap()).collect(),
        );
    }

    pub async fn set_failing(&self, name: &str) {
        self.failing.write().await.insert(name.to_string());
    }

    pub async fn calls(&self) -> Vec<(String, RecordType, Option<SocketAddr>)> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl DnsLookup for MockDnsLookup {
    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
        server: Option<SocketAddr>,
        _timeout: Duration,
    ) -> Result<DnsAnswer, DomainError> {
        self.calls
            .write()
            .await
            .push((name.to_string(), record_type, server));

        if let Some(server) = server {
            let key = (name.to_string(), record_type, server);
            if let Some(answer) = self.server_answers.read().await.get(&key) {
                return Ok(answer.clone());
            }
        }

        if self.failing.read().await.contains(name) {
            return Err(DomainError::Transport {
                target: name.to_string(),
                message: "mock failure".to_string(),
            });
        }

        if let Some(answer) = self
            .answers
            .read()
            .await
            .get(&(name.to_string(), record_type))
        {
            return Ok(answer.clone());
        }

        if record_type == RecordType::A {
            for (domain, ips) in self.wildcards.read().await.iter() {
                if name.ends_with(&format!(".{}", domain)) {
                    return Ok(DnsAnswer {
                        addresses: ips.clone(),
                        names: vec![],
                    });
                }
            }
        }

        Ok(DnsAnswer::default())
    }
}

// ============================================================================
// Mock CacheStore
// ============================================================================

#[derive(Clone, Default)]
pub struct MockCache {
    entries: Arc<RwLock<HashMap<String, (Value, Option<Duration>)>>>,
    sets: Arc<AtomicUsize>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.read().await.get(key).and_then(|(_, ttl)| *ttl)
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn insert(&self, key: &str, value: Value) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value, None));
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MockCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).map(|(v, _)| v.clone())
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent writers interleave as they would against a network store.
        tokio::task::yield_now().await;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value, ttl));
    }

    async fn del(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Mock CertificateSearch
// ============================================================================

#[derive(Clone, Default)]
pub struct MockCertificateSearch {
    results: Arc<RwLock<HashMap<String, Vec<CertificateNames>>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl MockCertificateSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_result(&self, query: &str, common_name: Option<&str>, name_value: Option<&str>) {
        self.results
            .write()
            .await
            .entry(query.to_string())
            .or_default()
            .push(CertificateNames {
                common_name: common_name.map(str::to_string),
                name_value: name_value.map(str::to_string),
            });
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }
}

#[async_trait]
impl CertificateSearch for MockCertificateSearch {
    async fn search(&self, query: &str) -> Result<Vec<CertificateNames>, DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::HttpStatus {
                status: 503,
                url: format!("mock://{}", query),
            });
        }
        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Mock RemoteListSource
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRemoteList {
    bodies: Arc<RwLock<HashMap<String, String>>>,
    fetches: Arc<AtomicUsize>,
}

impl MockRemoteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_body(&self, url: &str, body: &str) {
        self.bodies
            .write()
            .await
            .insert(url.to_string(), body.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteListSource for MockRemoteList {
    async fn fetch_text(&self, url: &str) -> Result<String, DomainError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

// ============================================================================
// Mock SourceConnector
// ============================================================================

pub struct MockConnector {
    name: &'static str,
    names: Vec<String>,
}

impl MockConnector {
    pub fn new(name: &'static str, names: &[&str]) -> Self {
        Self {
            name,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SourceConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_names(&self, _domain: &str) -> Vec<String> {
        self.names.clone()
    }
}

// ============================================================================
// Mock RateLimiter
// ============================================================================

#[derive(Clone)]
pub struct MockRateLimiter {
    allow: Arc<RwLock<bool>>,
    calls: Arc<AtomicUsize>,
}

impl MockRateLimiter {
    pub fn allowing() -> Self {
        Self {
            allow: Arc::new(RwLock::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denying() -> Self {
        Self {
            allow: Arc::new(RwLock::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for MockRateLimiter {
    async fn allow(&self, _client: &str, _bucket: &str, _limit: u32, _window: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.allow.read().await
    }
}
