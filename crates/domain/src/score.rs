//! Confidence scoring for aggregated host records.

use crate::subdomain_entry::SubdomainEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

const SUSPICIOUS_TAGS: [&str; 5] = ["wildcard", "underscore", "suspicious", "typo", "invalid"];

/// Relative weight of each signal in the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_w_source")]
    pub source: f64,
    #[serde(default = "default_w_frequency")]
    pub frequency: f64,
    #[serde(default = "default_w_dns")]
    pub dns: f64,
    #[serde(default = "default_w_ptr")]
    pub ptr: f64,
    #[serde(default = "default_w_penalty")]
    pub penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            source: default_w_source(),
            frequency: default_w_frequency(),
            dns: default_w_dns(),
            ptr: default_w_ptr(),
            penalty: default_w_penalty(),
        }
    }
}

fn default_w_source() -> f64 {
    40.0
}

fn default_w_frequency() -> f64 {
    15.0
}

fn default_w_dns() -> f64 {
    25.0
}

fn default_w_ptr() -> f64 {
    15.0
}

fn default_w_penalty() -> f64 {
    5.0
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.source + self.frequency + self.dns + self.ptr + self.penalty
    }
}

/// Authority weight per source name, on a 0..=`max_weight` scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    #[serde(default = "default_source_weights")]
    pub weights: HashMap<String, f64>,
    #[serde(default = "default_max_weight")]
    pub max_weight: f64,
    /// Distinct source count at which the frequency signal saturates.
    #[serde(default = "default_saturation")]
    pub saturation: u32,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self {
            weights: default_source_weights(),
            max_weight: default_max_weight(),
            saturation: default_saturation(),
        }
    }
}

fn default_source_weights() -> HashMap<String, f64> {
    [
        ("zone-transfer", 100.0),
        ("authoritative", 70.0),
        ("active-scan", 60.0),
        ("dns", 60.0),
        ("dns-bruteforce", 60.0),
        ("crtsh", 50.0),
        ("certspotter", 50.0),
        ("passive-scan", 30.0),
        ("anubis", 30.0),
        ("hackertarget", 30.0),
        ("alienvault", 30.0),
        ("urlscan", 30.0),
        ("webarchive", 30.0),
        ("threatminer", 30.0),
        ("bufferover", 30.0),
        ("rapiddns", 30.0),
        ("manual", 10.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_max_weight() -> f64 {
    100.0
}

fn default_saturation() -> u32 {
    10
}

impl SourceWeights {
    pub fn weight_of(&self, source: &str) -> f64 {
        self.weights
            .get(&source.to_lowercase())
            .or_else(|| self.weights.get(source))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(score: f64) -> Confidence {
    if score >= 0.7 {
        Confidence::High
    } else if score >= 0.4 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn clamp01(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    n.clamp(0.0, 1.0)
}

fn has_ptr_evidence(entry: &SubdomainEntry) -> bool {
    let mentions = |s: &str| {
        let lower = s.to_lowercase();
        lower.contains("ptr") || lower.contains("reverse")
    };

    entry.sources.values().any(|r| r.has_ptr_flag())
        || entry.source_names().any(mentions)
        || entry.tags.iter().any(|t| mentions(t))
}

fn suspicious_tag_count(entry: &SubdomainEntry) -> usize {
    entry
        .tags
        .iter()
        .filter(|t| SUSPICIOUS_TAGS.contains(&t.to_lowercase().as_str()))
        .count()
}

/// Weighted, normalized confidence in `[0, 1]`.
pub fn compute_score(entry: &SubdomainEntry, weights: &ScoreWeights, sources: &SourceWeights) -> f64 {
    let best = entry
        .source_names()
        .map(|s| sources.weight_of(s))
        .fold(0.0_f64, f64::max);
    let s = clamp01(best / sources.max_weight);

    let distinct = entry.sources.len() as f64;
    let f = clamp01((1.0 + distinct).ln() / (1.0 + sources.saturation as f64).ln());

    let ip_count = entry.ips.iter().filter(|ip| !ip.is_empty()).count() as f64;
    let d = clamp01(ip_count / 3.0);

    let p = if has_ptr_evidence(entry) { 1.0 } else { 0.0 };

    let t = clamp01(suspicious_tag_count(entry) as f64 / 2.0);

    let numerator = weights.source * s + weights.frequency * f + weights.dns * d + weights.ptr * p
        - weights.penalty * t;
    clamp01(numerator / weights.total())
}
