use crate::cidr::ipv4_to_int;
use crate::host::{is_valid_host, normalize_host};
use fancy_regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DOMAIN_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([a-z0-9\-_.]*[a-z0-9]\.[a-z]{2,})").expect("domain token pattern")
});

static ROUTE_ADD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^route\s+add\s+([\d.]+)").expect("route add pattern"));

/// Pulls valid, normalized host names out of free text such as certificate names.
pub fn extract_domains_from_text(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for caps in DOMAIN_TOKEN.captures_iter(text).flatten() {
        let Some(token) = caps.get(1) else { continue };
        let Ok(host) = normalize_host(token.as_str()) else {
            continue;
        };
        if is_valid_host(&host) && seen.insert(host.clone()) {
            out.push(host);
        }
    }
    out
}

fn is_dotted_quad(s: &str) -> bool {
    s.split('.').count() == 4 && ipv4_to_int(s) != 0
}

/// IPv4 addresses from a plain list or from `route add <ip> ...` lines, first occurrence order.
pub fn extract_ips_from_text(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for line in text.lines().map(str::trim) {
        let candidate = if line.to_lowercase().starts_with("route add") {
            ROUTE_ADD
                .captures(line)
                .ok()
                .flatten()
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
        } else if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            Some(line)
        } else {
            None
        };

        if let Some(ip) = candidate {
            if ip != "0.0.0.0" && is_dotted_quad(ip) && seen.insert(ip.to_string()) {
                out.push(ip.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domains_from_certificate_names() {
        let found = extract_domains_from_text("*.cdn.Example.com\nmail.example.com\nnot a domain");
        assert_eq!(found, vec!["cdn.example.com", "mail.example.com"]);
    }

    #[test]
    fn test_extract_domains_dedupes() {
        let found = extract_domains_from_text("a.example.org a.example.org A.EXAMPLE.ORG");
        assert_eq!(found, vec!["a.example.org"]);
    }

    #[test]
    fn test_extract_domains_empty_text() {
        assert!(extract_domains_from_text("").is_empty());
    }

    #[test]
    fn test_extract_ips_plain_and_route_lines() {
        let text = "route add 104.16.0.1 mask 255.255.255.255 0.0.0.0\n\
                    8.8.8.8\n\
                    route ADD 0.0.0.0 mask 0.0.0.0 10.0.0.1\n\
                    999.1.1.1\n\
                    8.8.8.8\n\
                    # comment 1.1.1.1\n";
        assert_eq!(extract_ips_from_text(text), vec!["104.16.0.1", "8.8.8.8"]);
    }
}
