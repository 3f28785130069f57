#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use subrecon_application::ports::{CacheStore, RateLimiter, RemoteListSource};
use subrecon_domain::DomainError;
use tokio::sync::RwLock;

// ============================================================================
// Mock RateLimiter
// ============================================================================

#[derive(Default)]
pub struct SweepCountingLimiter {
    sweeps: AtomicUsize,
}

impl SweepCountingLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for SweepCountingLimiter {
    async fn allow(&self, _client: &str, _bucket: &str, _limit: u32, _window: Duration) -> bool {
        true
    }

    fn sweep_idle(&self) -> usize {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        0
    }
}

// ============================================================================
// Mock RemoteListSource
// ============================================================================

#[derive(Default)]
pub struct MockRemoteList {
    bodies: RwLock<HashMap<String, String>>,
    fetches: AtomicUsize,
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
// Mock CacheStore
// ============================================================================

#[derive(Default)]
pub struct MockCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl CacheStore for MockCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: Value, _ttl: Option<Duration>) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn del(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
