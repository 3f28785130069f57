use crate::ports::SourceConnector;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Names one connector returned for a domain, already filtered.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceHit {
    pub source: &'static str,
    pub hosts: Vec<String>,
}

/// Keeps names equal to `domain` or under it, lowercased, without a leading `*.`.
pub fn filter_for_domain<I, S>(names: I, domain: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let domain = domain.to_lowercase();
    let suffix = format!(".{}", domain);
    let mut out = BTreeSet::new();
    for name in names {
        let lower = name.as_ref().trim().to_lowercase();
        let clean = lower.strip_prefix("*.").unwrap_or(&lower);
        if clean.is_empty() {
            continue;
        }
        if clean == domain || clean.ends_with(&suffix) {
            out.insert(clean.to_string());
        }
    }
    out.into_iter().collect()
}

/// Fans a domain out to every connector concurrently.
pub struct PassiveSourceService {
    connectors: Vec<Arc<dyn SourceConnector>>,
}

impl PassiveSourceService {
    pub fn new(connectors: Vec<Arc<dyn SourceConnector>>) -> Self {
        Self { connectors }
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.connectors.iter().map(|c| c.name()).collect()
    }

    pub async fn collect(&self, domain: &str) -> Vec<SourceHit> {
        let fetches = self.connectors.iter().map(|connector| async move {
            let names = connector.fetch_names(domain).await;
            let hosts = filter_for_domain(&names, domain);
            debug!(
                source = connector.name(),
                raw = names.len(),
                kept = hosts.len(),
                "Passive source answered"
            );
            SourceHit {
                source: connector.name(),
                hosts,
            }
        });
        join_all(fetches).await
    }
}
