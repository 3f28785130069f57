use chrono::Utc;
use redis::aio::ConnectionManager;
use std::time::Duration;
use subrecon_domain::DomainError;

/// Fixed-window counter shared through Redis: `INCR` per request, `EXPIRE` on the first hit.
pub struct RedisWindowLimiter {
    conn: ConnectionManager,
}

impl RedisWindowLimiter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn try_allow(
        &self,
        client: &str,
        bucket: &str,
        limit: u32,
        window: Duration,
    ) -> Result<bool, DomainError> {
        let key = window_key(client, bucket, window, Utc::now().timestamp_millis());
        let mut conn = self.conn.clone();

        let count = redis::cmd("INCR")
            .arg(&key)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;

        if count == 1 {
            redis::cmd("EXPIRE")
                .arg(&key)
                .arg(expire_secs(window))
                .query_async::<()>(&mut conn)
                .await
                .map_err(|e| DomainError::BackendUnavailable(e.to_string()))?;
        }

        Ok(count <= i64::from(limit))
    }
}

/// `rl:{bucket}:{client}:{windowIndex}`.
pub fn window_key(client: &str, bucket: &str, window: Duration, now_ms: i64) -> String {
    let window_ms = window.as_millis().max(1) as i64;
    format!("rl:{}:{}:{}", bucket, client, now_ms.div_euclid(window_ms))
}

/// One second past the window so the key outlives every request counted in it.
pub fn expire_secs(window: Duration) -> u64 {
    window.as_millis().div_ceil(1000) as u64 + 1
}
