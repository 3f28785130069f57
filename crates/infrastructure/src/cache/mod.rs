pub mod memory;
pub mod redis;

pub use memory::MemoryCache;
pub use self::redis::RedisCache;

use ::redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::CacheStore;
use subrecon_domain::config::CacheConfig;
use subrecon_domain::DomainError;
use tracing::{info, warn};

/// Opens a managed Redis connection and proves it answers `PING` within `timeout`.
pub async fn connect_redis(url: &str, timeout: Duration) -> Result<ConnectionManager, DomainError> {
    let client = ::redis::Client::open(url)
        .map_err(|e| DomainError::BackendUnavailable(format!("invalid redis url: {}", e)))?;

    let mut conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            target: "redis".to_string(),
            timeout,
        })?
        .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

    let pong = tokio::time::timeout(timeout, ::redis::cmd("PING").query_async::<String>(&mut conn))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            target: "redis".to_string(),
            timeout,
        })?
        .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

    if pong != "PONG" {
        return Err(DomainError::BackendUnavailable(format!(
            "unexpected PING reply '{}'",
            pong
        )));
    }
    Ok(conn)
}

/// The cache the process runs with, plus the Redis connection when there is one.
pub struct CacheBackends {
    pub cache: Arc<dyn CacheStore>,
    pub redis: Option<ConnectionManager>,
}

/// Redis when configured and reachable, otherwise the in-memory LRU.
pub async fn build_cache(config: &CacheConfig) -> CacheBackends {
    let memory = || -> Arc<dyn CacheStore> {
        Arc::new(MemoryCache::new(
            config.capacity,
            Duration::from_millis(config.default_ttl_ms),
        ))
    };

    let Some(url) = config.redis_url.as_deref().filter(|u| !u.is_empty()) else {
        info!(backend = "memory", "Cache backend selected");
        return CacheBackends {
            cache: memory(),
            redis: None,
        };
    };

    match connect_redis(url, Duration::from_millis(config.connect_timeout_ms)).await {
        Ok(conn) => {
            info!(backend = "redis", prefix = %config.key_prefix, "Cache backend selected");
            let cache = RedisCache::new(conn.clone(), config.key_prefix.clone())
                .with_default_ttl(Duration::from_millis(config.default_ttl_ms));
            CacheBackends {
                cache: Arc::new(cache),
                redis: Some(conn),
            }
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
            CacheBackends {
                cache: memory(),
                redis: None,
            }
        }
    }
}
