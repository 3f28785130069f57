use crate::ports::{set_json, CacheStore, RateLimiter};
use crate::services::{Aggregator, AntifilterService, PassiveSourceService, ResolverService, TaskRunner};
use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use subrecon_domain::{
    classify, compute_score, is_valid_host, normalize_host, Confidence, DomainError,
    ScoreWeights, SourceRecord, SourceWeights, SubdomainEntry,
};
use tracing::{debug, info, instrument};

pub const SOURCE_APEX: &str = "dns";
pub const SOURCE_BRUTEFORCE: &str = "dns-bruteforce";
pub const SOURCE_ZONE_TRANSFER: &str = "zone-transfer";

pub const TAG_WILDCARD: &str = "wildcard";
pub const TAG_UNDERSCORE: &str = "underscore";
pub const TAG_ANTIFILTER: &str = "antifilter";

const RATE_BUCKET: &str = "scan";

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub concurrency: usize,
    pub bruteforce_retries: u32,
    pub backoff: Duration,
    pub aggregated_ttl: Duration,
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub weights: ScoreWeights,
    pub source_weights: SourceWeights,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            concurrency: 10,
            bruteforce_retries: 1,
            backoff: Duration::from_millis(200),
            aggregated_ttl: Duration::from_secs(24 * 60 * 60),
            rate_limit: 500,
            rate_window: Duration::from_secs(60),
            weights: ScoreWeights::default(),
            source_weights: SourceWeights::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub client: String,
    pub domain: String,
    /// Candidate labels combined with the domain for brute force.
    pub wordlist: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHost {
    pub entry: SubdomainEntry,
    pub score: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub domain: String,
    pub wildcard_detected: bool,
    pub wildcard_ips: Vec<String>,
    pub sources: Vec<String>,
    pub total: usize,
    pub hosts: Vec<ScoredHost>,
}

/// Per-host evidence collected during one scan, before aggregation.
#[derive(Debug, Default)]
struct Draft {
    ips: BTreeSet<IpAddr>,
    sources: BTreeSet<&'static str>,
}

impl Draft {
    fn is_bruteforce_only(&self) -> bool {
        self.sources.len() == 1 && self.sources.contains(SOURCE_BRUTEFORCE)
    }
}

pub struct ScanDomainUseCase {
    resolver: Arc<ResolverService>,
    passive: Arc<PassiveSourceService>,
    aggregator: Arc<Aggregator>,
    antifilter: Arc<AntifilterService>,
    cache: Arc<dyn CacheStore>,
    rate_limiter: Arc<dyn RateLimiter>,
    settings: ScanSettings,
}

impl ScanDomainUseCase {
    pub fn new(
        resolver: Arc<ResolverService>,
        passive: Arc<PassiveSourceService>,
        aggregator: Arc<Aggregator>,
        antifilter: Arc<AntifilterService>,
        cache: Arc<dyn CacheStore>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            resolver,
            passive,
            aggregator,
            antifilter,
            cache,
            rate_limiter,
            settings: ScanSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ScanSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn report_cache_key(domain: &str) -> String {
        format!("check:{}", domain)
    }

    #[instrument(skip(self, request), fields(domain = %request.domain, client = %request.client))]
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanReport, DomainError> {
        if !self
            .rate_limiter
            .allow(
                &request.client,
                RATE_BUCKET,
                self.settings.rate_limit,
                self.settings.rate_window,
            )
            .await
        {
            return Err(DomainError::RateLimited {
                client: request.client,
                bucket: RATE_BUCKET.to_string(),
            });
        }

        let domain = normalize_host(&request.domain)?;
        if !is_valid_host(&domain) {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a registrable host",
                domain
            )));
        }

        let mut drafts: BTreeMap<String, Draft> = BTreeMap::new();

        let (apex_ips, wildcard, zone_hosts) = tokio::join!(
            self.resolver.resolve_any_address(&domain),
            self.resolver.detect_wildcard(&domain),
            self.resolver.attempt_zone_transfer(&domain),
        );

        if !apex_ips.is_empty() {
            let draft = drafts.entry(domain.clone()).or_default();
            draft.ips.extend(apex_ips);
            draft.sources.insert(SOURCE_APEX);
        }
        for host in &zone_hosts {
            drafts
                .entry(host.clone())
                .or_default()
                .sources
                .insert(SOURCE_ZONE_TRANSFER);
        }

        let runner = TaskRunner::new(self.settings.concurrency)
            .with_retries(self.settings.bruteforce_retries)
            .with_backoff(self.settings.backoff);

        let candidates = bruteforce_candidates(&request.wordlist, &domain);
        let brute = self.resolve_all(&runner, &candidates).await;
        for (host, ips) in candidates.into_iter().zip(brute) {
            if ips.is_empty() {
                continue;
            }
            let draft = drafts.entry(host).or_default();
            draft.ips.extend(ips);
            draft.sources.insert(SOURCE_BRUTEFORCE);
        }

        let mut used_sources: BTreeSet<String> = BTreeSet::new();
        used_sources.insert(SOURCE_BRUTEFORCE.to_string());
        if drafts.values().any(|d| d.sources.contains(SOURCE_APEX)) {
            used_sources.insert(SOURCE_APEX.to_string());
        }
        if !zone_hosts.is_empty() {
            used_sources.insert(SOURCE_ZONE_TRANSFER.to_string());
        }

        for hit in self.passive.collect(&domain).await {
            if !hit.hosts.is_empty() {
                used_sources.insert(hit.source.to_string());
            }
            for host in hit.hosts {
                drafts.entry(host).or_default().sources.insert(hit.source);
            }
        }

        let unresolved: Vec<String> = drafts
            .iter()
            .filter(|(_, d)| d.ips.is_empty())
            .map(|(h, _)| h.clone())
            .collect();
        let resolved = self.resolve_all(&runner, &unresolved).await;
        for (host, ips) in unresolved.iter().zip(resolved) {
            if let Some(draft) = drafts.get_mut(host) {
                draft.ips.extend(ips);
            }
        }

        let wildcard_ips = if wildcard {
            self.resolver.wildcard_ips(&domain).await
        } else {
            BTreeSet::new()
        };
        if !wildcard_ips.is_empty() {
            let before = drafts.len();
            drafts.retain(|_, d| {
                !(d.is_bruteforce_only() && !d.ips.is_empty() && d.ips.is_subset(&wildcard_ips))
            });
            debug!(
                dropped = before - drafts.len(),
                "Discarded brute-force hits answered by the wildcard"
            );
        }

        let lists = self.antifilter.lists().await;
        let seen_at = Utc::now();

        let observations: Vec<SubdomainEntry> = drafts
            .iter()
            .flat_map(|(host, draft)| {
                let ips: Vec<String> = draft.ips.iter().map(|ip| ip.to_string()).collect();
                let mut tags = BTreeSet::new();
                if !wildcard_ips.is_empty() && !draft.ips.is_empty() && draft.ips.is_subset(&wildcard_ips) {
                    tags.insert(TAG_WILDCARD);
                }
                if host.contains('_') {
                    tags.insert(TAG_UNDERSCORE);
                }
                if lists.check_membership(host, &ips) {
                    tags.insert(TAG_ANTIFILTER);
                }

                draft
                    .sources
                    .iter()
                    .map(|source| {
                        let mut entry =
                            SubdomainEntry::observed(host.clone(), SourceRecord::new(*source, seen_at))
                                .with_ips(ips.iter().cloned())
                                .with_registrable_split();
                        for tag in &tags {
                            entry = entry.with_tag(*tag);
                        }
                        entry
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let upserted = join_all(observations.into_iter().map(|o| self.aggregator.upsert(o))).await;

        let mut latest: HashMap<String, SubdomainEntry> = HashMap::new();
        for entry in upserted.into_iter().flatten() {
            let replace = latest
                .get(&entry.host)
                .map_or(true, |prev| entry.sources.len() >= prev.sources.len());
            if replace {
                latest.insert(entry.host.clone(), entry);
            }
        }

        let mut hosts: Vec<ScoredHost> = latest
            .into_values()
            .map(|entry| {
                let score = compute_score(&entry, &self.settings.weights, &self.settings.source_weights);
                ScoredHost {
                    confidence: classify(score),
                    score,
                    entry,
                }
            })
            .collect();
        hosts.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.entry.host.cmp(&b.entry.host))
        });

        let report = ScanReport {
            domain: domain.clone(),
            wildcard_detected: wildcard,
            wildcard_ips: wildcard_ips.iter().map(|ip| ip.to_string()).collect(),
            sources: used_sources.into_iter().collect(),
            total: hosts.len(),
            hosts,
        };

        set_json(
            self.cache.as_ref(),
            &Self::report_cache_key(&domain),
            &report,
            Some(self.settings.aggregated_ttl),
        )
        .await;

        info!(
            domain = %domain,
            hosts = report.total,
            wildcard = report.wildcard_detected,
            sources = report.sources.len(),
            "Scan finished"
        );

        Ok(report)
    }

    async fn resolve_all(&self, runner: &TaskRunner, hosts: &[String]) -> Vec<Vec<IpAddr>> {
        let tasks: Vec<_> = hosts
            .iter()
            .map(|host| move || async move { Ok::<_, DomainError>(self.resolver.resolve_any_address(host).await) })
            .collect();

        runner
            .run_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap_or_default())
            .collect()
    }
}

/// `label.domain` for each usable wordlist line, first occurrence order.
pub fn bruteforce_candidates(wordlist: &[String], domain: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    wordlist
        .iter()
        .map(|l| l.trim().trim_matches('.').to_lowercase())
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.contains(char::is_whitespace))
        .map(|l| format!("{}.{}", l, domain))
        .filter(|h| seen.insert(h.clone()))
        .collect()
}
