use super::{Adapters, Services};
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::use_cases::{
    CheckAntifilterUseCase, MapIpsToDomainsUseCase, ReverseSettings, ScanDomainUseCase,
    ScanSettings,
};
use subrecon_domain::Config;

pub struct UseCases {
    pub scan: Arc<ScanDomainUseCase>,
    pub map_ips: Arc<MapIpsToDomainsUseCase>,
    pub check_antifilter: Arc<CheckAntifilterUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, adapters: &Adapters, services: &Services) -> Self {
        let rate_window = Duration::from_millis(config.rate_limit.window_ms);

        let scan = ScanDomainUseCase::new(
            services.resolver.clone(),
            services.passive.clone(),
            services.aggregator.clone(),
            services.antifilter.clone(),
            adapters.cache.clone(),
            adapters.rate_limiter.clone(),
        )
        .with_settings(ScanSettings {
            concurrency: config.scan.concurrency,
            bruteforce_retries: config.scan.bruteforce_retries,
            backoff: Duration::from_millis(config.scan.backoff_ms),
            aggregated_ttl: Duration::from_millis(config.cache.aggregated_ttl_ms),
            rate_limit: config.rate_limit.limit,
            rate_window,
            weights: config.scoring.weights,
            source_weights: config.scoring.sources.clone(),
        });

        let map_ips = MapIpsToDomainsUseCase::new(services.reverse.clone(), adapters.rate_limiter.clone())
            .with_settings(ReverseSettings {
                concurrency: config.reverse.concurrency,
                timeout: Duration::from_millis(config.dns.timeout_ms),
                max_ips: config.reverse.max_ips,
                rate_limit: config.rate_limit.limit,
                rate_window,
            });

        Self {
            scan: Arc::new(scan),
            map_ips: Arc::new(map_ips),
            check_antifilter: Arc::new(CheckAntifilterUseCase::new(services.antifilter.clone())),
        }
    }
}
