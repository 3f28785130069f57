use chrono::{DateTime, Utc};
use dashmap::DashMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Response, StatusCode};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use subrecon_application::services::task_runner::backoff_delay;
use subrecon_domain::DomainError;
use tokio::sync::Semaphore;
use tracing::debug;

/// Shared client with connection pooling; per-request deadlines come from [`FetchOptions`].
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

const FALLBACK_RETRY_AFTER: Duration = Duration::from_secs(1);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOptions {
    /// Total attempts, including the first.
    pub attempts: u32,
    pub backoff: Duration,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(200),
            timeout: Duration::from_millis(5000),
        }
    }
}

impl FetchOptions {
    pub fn new(attempts: u32, backoff: Duration, timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
            timeout,
        }
    }
}

/// GET with per-host concurrency limits, per-attempt timeouts and retry with backoff.
///
/// 429 waits for `Retry-After` when present, 5xx and network errors back off
/// exponentially. The last attempt's response is returned as-is whatever its
/// status; only a last-attempt network error becomes `Err`.
pub struct ResilientFetcher {
    client: reqwest::Client,
    hosts: DashMap<String, Arc<Semaphore>>,
    per_host_concurrency: usize,
    user_agent: String,
}

impl ResilientFetcher {
    pub fn new(per_host_concurrency: usize) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            hosts: DashMap::new(),
            per_host_concurrency: per_host_concurrency.max(1),
            user_agent: "domain-checker/1.0".to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn host_slot(&self, url: &str) -> Arc<Semaphore> {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| {
                u.host_str()
                    .map(|h| format!("{}:{}", h, u.port_or_known_default().unwrap_or(0)))
            })
            .unwrap_or_else(|| "default".to_string());

        self.hosts
            .entry(host)
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_concurrency)))
            .clone()
    }

    pub async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, &str)],
        options: FetchOptions,
    ) -> Result<Response, DomainError> {
        let slot = self.host_slot(url);
        let _permit = slot
            .acquire_owned()
            .await
            .map_err(|e| DomainError::TaskFailed(e.to_string()))?;

        let header_map = self.header_map(headers);
        let attempts = options.attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let last = attempt >= attempts;

            let sent = tokio::time::timeout(
                options.timeout,
                self.client.get(url).headers(header_map.clone()).send(),
            )
            .await;

            let delay = match sent {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if last || !is_retryable_status(status) {
                        return Ok(response);
                    }
                    let delay = if status == StatusCode::TOO_MANY_REQUESTS {
                        response
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .map(|v| parse_retry_after(v, Utc::now()))
                            .unwrap_or_else(|| backoff_delay(options.backoff, attempt))
                    } else {
                        backoff_delay(options.backoff, attempt)
                    };
                    debug!(
                        url = %url,
                        attempt,
                        status = status.as_u16(),
                        delay_ms = delay.as_millis() as u64,
                        "Retryable HTTP status, backing off"
                    );
                    delay
                }
                Ok(Err(e)) => {
                    debug!(url = %url, attempt, error = %e, "HTTP request failed");
                    if last {
                        return Err(DomainError::Transport {
                            target: url.to_string(),
                            message: e.to_string(),
                        });
                    }
                    backoff_delay(options.backoff, attempt)
                }
                Err(_) => {
                    debug!(url = %url, attempt, "HTTP request timed out");
                    if last {
                        return Err(DomainError::TransportTimeout {
                            target: url.to_string(),
                            timeout: options.timeout,
                        });
                    }
                    backoff_delay(options.backoff, attempt)
                }
            };

            tokio::time::sleep(delay).await;
        }
    }

    /// Body of a 2xx response; any other final status is `HttpStatus`.
    pub async fn get_text(
        &self,
        url: &str,
        headers: &[(&'static str, &str)],
        options: FetchOptions,
    ) -> Result<String, DomainError> {
        let response = self.get(url, headers, options).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().await.map_err(|e| DomainError::Transport {
            target: url.to_string(),
            message: e.to_string(),
        })
    }

    fn header_map(&self, headers: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            map.insert(USER_AGENT, ua);
        }
        for (name, value) in headers {
            if let Ok(value) = HeaderValue::from_str(value) {
                map.insert(HeaderName::from_static(*name), value);
            }
        }
        map
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Delta-seconds or an HTTP date, capped at five minutes; anything else waits one second.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Duration {
    let value = value.trim();
    if let Ok(secs) = value.parse::<f64>() {
        if !(secs.is_finite() && secs >= 0.0) {
            return Duration::ZERO;
        }
        return Duration::try_from_secs_f64(secs.min(MAX_RETRY_AFTER.as_secs_f64()))
            .unwrap_or(FALLBACK_RETRY_AFTER);
    }
    match DateTime::parse_from_rfc2822(value) {
        Ok(at) => (at.with_timezone(&Utc) - now)
            .to_std()
            .map(|wait| wait.min(MAX_RETRY_AFTER))
            .unwrap_or(Duration::ZERO),
        Err(_) => FALLBACK_RETRY_AFTER,
    }
}
