use std::sync::Arc;
use std::time::Duration;
use subrecon_application::ports::{
    CacheStore, CertificateSearch, DnsLookup, RateLimiter, RemoteListSource, SourceConnector,
};
use subrecon_domain::Config;
use subrecon_infrastructure::cache::build_cache;
use subrecon_infrastructure::dns::{parse_server, system_nameservers, HickoryDnsLookup};
use subrecon_infrastructure::http::{CrtShSearch, HttpRemoteList, ResilientFetcher};
use subrecon_infrastructure::rate_limit::{HybridRateLimiter, RedisWindowLimiter, TokenBucketLimiter};
use subrecon_infrastructure::sources::{default_connectors, SourceClient};
use tracing::{info, warn};

/// Infrastructure adapters behind the application ports.
pub struct Adapters {
    pub cache: Arc<dyn CacheStore>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub lookup: Arc<dyn DnsLookup>,
    pub certificates: Arc<dyn CertificateSearch>,
    pub remote_lists: Arc<dyn RemoteListSource>,
    pub connectors: Vec<Arc<dyn SourceConnector>>,
    pub public_resolvers: Vec<std::net::SocketAddr>,
}

impl Adapters {
    pub async fn new(config: &Config) -> Self {
        let backends = build_cache(&config.cache).await;

        let rate_limiter: Arc<dyn RateLimiter> = Arc::new(HybridRateLimiter::new(
            backends.redis.map(RedisWindowLimiter::new),
            Arc::new(TokenBucketLimiter::new()),
        ));

        let system = system_nameservers(&config.dns.system_servers, &config.dns.resolv_conf);
        if system.is_empty() {
            warn!("No system nameservers found; lookups will rely on public resolvers");
        }
        let public_resolvers: Vec<_> = config
            .dns
            .public_resolvers
            .iter()
            .filter_map(|s| {
                let parsed = parse_server(s);
                if parsed.is_none() {
                    warn!(server = %s, "Ignoring unparseable public resolver");
                }
                parsed
            })
            .collect();
        info!(
            system = system.len(),
            public = public_resolvers.len(),
            "DNS servers configured"
        );

        let http_timeout = Duration::from_millis(config.http.timeout_ms);
        let fetcher = Arc::new(
            ResilientFetcher::new(config.http.per_host_concurrency)
                .with_user_agent(config.http.user_agent.clone()),
        );

        let certificates = Arc::new(CrtShSearch::new(
            fetcher.clone(),
            config.reverse.ct_search_url.clone(),
            http_timeout,
        ));
        let remote_lists = Arc::new(
            HttpRemoteList::new(fetcher.clone(), http_timeout).with_retry(
                config.http.retries,
                Duration::from_millis(config.http.backoff_ms),
            ),
        );
        let connectors = default_connectors(SourceClient::new(fetcher, http_timeout));

        Self {
            cache: backends.cache,
            rate_limiter,
            lookup: Arc::new(HickoryDnsLookup::new(system)),
            certificates,
            remote_lists,
            connectors,
            public_resolvers,
        }
    }
}
