use super::Adapters;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::services::{
    Aggregator, AntifilterService, PassiveSourceService, ResolverService, ReverseLookupService,
};
use subrecon_domain::Config;

pub struct Services {
    pub resolver: Arc<ResolverService>,
    pub passive: Arc<PassiveSourceService>,
    pub aggregator: Arc<Aggregator>,
    pub antifilter: Arc<AntifilterService>,
    pub reverse: Arc<ReverseLookupService>,
}

impl Services {
    pub fn new(config: &Config, adapters: &Adapters) -> Self {
        let resolver = ResolverService::new(adapters.lookup.clone(), adapters.public_resolvers.clone())
            .with_timeout(Duration::from_millis(config.dns.timeout_ms))
            .with_zone_transfer_max_ns(config.dns.zone_transfer_max_ns)
            .with_wildcard_probes(config.dns.wildcard_probes);

        let aggregator = Aggregator::new(adapters.cache.clone())
            .with_ttl(Duration::from_millis(config.cache.a_record_ttl_ms));

        let antifilter = AntifilterService::new(
            adapters.remote_lists.clone(),
            adapters.cache.clone(),
            config.antifilter.domains_url.clone(),
            config.antifilter.ips_url.clone(),
        )
        .with_ttl(Duration::from_millis(config.antifilter.cache_ttl_ms));

        let reverse = ReverseLookupService::new(
            adapters.lookup.clone(),
            adapters.certificates.clone(),
            adapters.cache.clone(),
        )
        .with_ttls(
            Duration::from_millis(config.reverse.ptr_ttl_ms),
            Duration::from_millis(config.reverse.ct_ttl_ms),
            Duration::from_millis(config.reverse.result_ttl_ms),
        );

        Self {
            resolver: Arc::new(resolver),
            passive: Arc::new(PassiveSourceService::new(adapters.connectors.clone())),
            aggregator: Arc::new(aggregator),
            antifilter: Arc::new(antifilter),
            reverse: Arc::new(reverse),
        }
    }
}
