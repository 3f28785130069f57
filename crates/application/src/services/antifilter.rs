use crate::ports::{get_json, set_json, CacheStore, RemoteListSource};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::cidr::{parse_domain_list, parse_range_list};
use subrecon_domain::{AntifilterLists, CidrRange};
use tracing::{debug, info};

const DOMAINS_KEY: &str = "antifilter:domains";
const RANGES_KEY: &str = "antifilter:ips";

/// Cached community block-lists.
///
/// A failed download leaves the cache untouched and reads as an empty list.
pub struct AntifilterService {
    source: Arc<dyn RemoteListSource>,
    cache: Arc<dyn CacheStore>,
    domains_url: String,
    ips_url: String,
    ttl: Duration,
}

impl AntifilterService {
    pub fn new(
        source: Arc<dyn RemoteListSource>,
        cache: Arc<dyn CacheStore>,
        domains_url: impl Into<String>,
        ips_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache,
            domains_url: domains_url.into(),
            ips_url: ips_url.into(),
            ttl: Duration::from_secs(6 * 60 * 60),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn domains(&self) -> HashSet<String> {
        if let Some(cached) = get_json::<Vec<String>>(self.cache.as_ref(), DOMAINS_KEY).await {
            return cached.into_iter().collect();
        }
        self.fetch_domains().await.unwrap_or_default()
    }

    pub async fn ranges(&self) -> Vec<CidrRange> {
        if let Some(cached) = get_json::<Vec<CidrRange>>(self.cache.as_ref(), RANGES_KEY).await {
            return cached;
        }
        self.fetch_ranges().await.unwrap_or_default()
    }

    pub async fn lists(&self) -> AntifilterLists {
        let (domains, ranges) = tokio::join!(self.domains(), self.ranges());
        AntifilterLists::new(domains, ranges)
    }

    pub async fn check_membership(&self, host: &str, ips: &[String]) -> bool {
        self.lists().await.check_membership(host, ips)
    }

    /// Re-downloads both lists, replacing cached copies that downloaded fine.
    pub async fn refresh(&self) -> (usize, usize) {
        let (domains, ranges) = tokio::join!(self.fetch_domains(), self.fetch_ranges());
        let counts = (
            domains.map(|d| d.len()).unwrap_or(0),
            ranges.map(|r| r.len()).unwrap_or(0),
        );
        info!(
            domains = counts.0,
            ranges = counts.1,
            "Antifilter lists refreshed"
        );
        counts
    }

    async fn fetch_domains(&self) -> Option<HashSet<String>> {
        let text = match self.source.fetch_text(&self.domains_url).await {
            Ok(t) => t,
            Err(e) => {
                debug!(url = %self.domains_url, error = %e, "Antifilter domain list fetch failed");
                return None;
            }
        };

        let domains = parse_domain_list(&text);
        let as_list: Vec<&String> = domains.iter().collect();
        set_json(self.cache.as_ref(), DOMAINS_KEY, &as_list, Some(self.ttl)).await;
        Some(domains)
    }

    async fn fetch_ranges(&self) -> Option<Vec<CidrRange>> {
        let text = match self.source.fetch_text(&self.ips_url).await {
            Ok(t) => t,
            Err(e) => {
                debug!(url = %self.ips_url, error = %e, "Antifilter IP list fetch failed");
                return None;
            }
        };

        let ranges = parse_range_list(&text);
        set_json(self.cache.as_ref(), RANGES_KEY, &ranges, Some(self.ttl)).await;
        Some(ranges)
    }
}
