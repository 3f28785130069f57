use crate::host::split_registrable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// One observation of a host by a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub source: String,
    pub seen_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl SourceRecord {
    pub fn new(source: impl Into<String>, seen_at: DateTime<Utc>) -> Self {
        Self {
            source: source.into(),
            seen_at,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Metadata flags that mark a confirmed reverse-DNS match.
    pub fn has_ptr_flag(&self) -> bool {
        ["ptr", "ptrMatch", "ptrMatched"]
            .iter()
            .any(|k| self.metadata.get(*k) == Some(&Value::Bool(true)))
    }
}

/// Canonical record for one host, built up by merging observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainEntry {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub ips: BTreeSet<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// At most one record per source name.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubdomainEntry {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            domain: None,
            subdomain: None,
            ips: BTreeSet::new(),
            tags: BTreeSet::new(),
            sources: BTreeMap::new(),
            first_seen: None,
            last_seen: None,
            extra: Map::new(),
        }
    }

    /// A single-source observation stamped at `seen_at`.
    pub fn observed(host: impl Into<String>, source: SourceRecord) -> Self {
        let seen_at = source.seen_at;
        let mut entry = Self::new(host);
        entry.sources.insert(source.source.clone(), source);
        entry.first_seen = Some(seen_at);
        entry.last_seen = Some(seen_at);
        entry
    }

    pub fn with_ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ips.extend(ips.into_iter().map(Into::into));
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Fills `domain` and `subdomain` from the public suffix list.
    pub fn with_registrable_split(mut self) -> Self {
        let (domain, subdomain) = split_registrable(&self.host);
        self.domain = domain;
        self.subdomain = subdomain;
        self
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

fn earliest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    }
}

fn latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

/// Reconciles an incoming observation with the stored entry for the same host.
///
/// Sets are unioned, each source keeps its most recent record (ties go to
/// `incoming`), `first_seen` takes the earliest known value and `last_seen`
/// the latest. Scalar fields are overridden by `incoming` when it carries them.
pub fn merge(existing: Option<&SubdomainEntry>, incoming: SubdomainEntry) -> SubdomainEntry {
    let Some(existing) = existing else {
        let now = Utc::now();
        let mut entry = incoming;
        let first = entry.first_seen.or(entry.last_seen).unwrap_or(now);
        let last = entry.last_seen.or(entry.first_seen).unwrap_or(now);
        entry.first_seen = Some(first);
        entry.last_seen = Some(last.max(first));
        return entry;
    };

    let mut sources = existing.sources.clone();
    for (name, record) in incoming.sources {
        match sources.get(&name) {
            Some(prev) if prev.seen_at > record.seen_at => {}
            _ => {
                sources.insert(name, record);
            }
        }
    }

    let mut extra = existing.extra.clone();
    extra.extend(incoming.extra);

    SubdomainEntry {
        host: existing.host.clone(),
        domain: incoming.domain.or_else(|| existing.domain.clone()),
        subdomain: incoming.subdomain.or_else(|| existing.subdomain.clone()),
        ips: existing.ips.union(&incoming.ips).cloned().collect(),
        tags: existing.tags.union(&incoming.tags).cloned().collect(),
        sources,
        first_seen: earliest(existing.first_seen, incoming.first_seen),
        last_seen: latest(existing.last_seen, incoming.last_seen),
        extra,
    }
}
