use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde_json::Value;
use std::time::Duration;
use subrecon_application::ports::CacheStore;
use tracing::debug;

/// Shorter TTLs are rounded up to this.
const MIN_TTL_MS: u64 = 1000;

/// JSON values under a key prefix. Every backend error degrades to a miss or a dropped write.
pub struct RedisCache {
    conn: ConnectionManager,
    prefix: String,
    default_ttl: Option<Duration>,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            default_ttl: None,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

pub(crate) fn px_millis(ttl: Duration) -> u64 {
    (ttl.as_millis().min(u64::MAX as u128) as u64).max(MIN_TTL_MS)
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<Value> {
        let mut conn = self.conn.clone();
        let raw = match redis::cmd("GET")
            .arg(self.key(key))
            .query_async::<Option<String>>(&mut conn)
            .await
        {
            Ok(raw) => raw?,
            Err(e) => {
                debug!(key = %key, error = %e, "Redis GET failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key = %key, error = %e, "Redis value is not JSON");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let raw = value.to_string();
        let mut cmd = redis::cmd("SET");
        cmd.arg(self.key(key)).arg(raw);
        if let Some(ttl) = ttl.or(self.default_ttl).filter(|t| !t.is_zero()) {
            cmd.arg("PX").arg(px_millis(ttl));
        }

        let mut conn = self.conn.clone();
        if let Err(e) = cmd.query_async::<()>(&mut conn).await {
            debug!(key = %key, error = %e, "Redis SET failed");
        }
    }

    async fn del(&self, key: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = redis::cmd("DEL")
            .arg(self.key(key))
            .query_async::<()>(&mut conn)
            .await
        {
            debug!(key = %key, error = %e, "Redis DEL failed");
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
