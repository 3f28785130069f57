use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// IPv4 range with the network bits already masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CidrRange {
    pub network: u32,
    pub mask: u32,
}

impl CidrRange {
    pub fn contains(&self, ip: u32) -> bool {
        ip & self.mask == self.network
    }
}

fn parse_octets(ip: &str) -> Option<u32> {
    let mut parts = ip.split('.');
    let mut acc: u32 = 0;
    for _ in 0..4 {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let octet: u32 = part.parse().ok()?;
        if octet > 255 {
            return None;
        }
        acc = (acc << 8) | octet;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(acc)
}

/// Big-endian integer form of a dotted IPv4 address; `0` for malformed input.
pub fn ipv4_to_int(ip: &str) -> u32 {
    parse_octets(ip.trim()).unwrap_or(0)
}

/// Parses `ip/bits` or a bare `ip` (treated as `/32`).
pub fn parse_cidr(spec: &str) -> Option<CidrRange> {
    let spec = spec.trim();
    let Some((ip_part, bits_part)) = spec.split_once('/') else {
        let ip = ipv4_to_int(spec);
        return (ip != 0).then_some(CidrRange {
            network: ip,
            mask: u32::MAX,
        });
    };

    let bits: i64 = bits_part.trim().parse().ok()?;
    if !(0..=32).contains(&bits) {
        return None;
    }
    let ip = parse_octets(ip_part.trim())?;
    let mask = if bits == 0 {
        0
    } else {
        u32::MAX << (32 - bits as u32)
    };

    Some(CidrRange {
        network: ip & mask,
        mask,
    })
}

pub fn is_in_ranges(ip: &str, ranges: &[CidrRange]) -> bool {
    let value = ipv4_to_int(ip);
    if value == 0 {
        return false;
    }
    ranges.iter().any(|r| r.contains(value))
}

/// Community block-lists: listed domains plus listed IPv4 ranges.
#[derive(Debug, Clone, Default)]
pub struct AntifilterLists {
    pub domains: HashSet<String>,
    pub ranges: Vec<CidrRange>,
}

impl AntifilterLists {
    pub fn new(domains: HashSet<String>, ranges: Vec<CidrRange>) -> Self {
        Self { domains, ranges }
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.ranges.is_empty()
    }

    /// Exact host match, a listed parent (the bare TLD never counts), or any IP inside a listed range.
    pub fn check_membership<I, S>(&self, host: &str, ips: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lower = host.to_lowercase();
        if self.domains.contains(&lower) {
            return true;
        }

        let labels: Vec<&str> = lower.split('.').collect();
        for i in 1..labels.len().saturating_sub(1) {
            if self.domains.contains(&labels[i..].join(".")) {
                return true;
            }
        }

        if self.ranges.is_empty() {
            return false;
        }
        ips.into_iter()
            .any(|ip| is_in_ranges(ip.as_ref(), &self.ranges))
    }
}

/// Newline-delimited list; blank lines and `#` comments are skipped.
fn list_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

pub fn parse_domain_list(text: &str) -> HashSet<String> {
    list_lines(text).map(|l| l.to_lowercase()).collect()
}

pub fn parse_range_list(text: &str) -> Vec<CidrRange> {
    list_lines(text).filter_map(parse_cidr).collect()
}
