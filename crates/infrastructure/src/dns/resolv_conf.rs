//! System resolver discovery from `resolv.conf`.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::{debug, warn};

const DNS_PORT: u16 = 53;

/// `nameserver` entries in file order, scope ids and malformed lines skipped.
pub fn parse_nameservers(contents: &str) -> Vec<SocketAddr> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("nameserver"), Some(addr)) => Some(addr),
                _ => None,
            }
        })
        .filter_map(|addr| {
            let addr = addr.split('%').next().unwrap_or(addr);
            addr.parse::<IpAddr>().ok()
        })
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .collect()
}

/// Explicit servers when configured, otherwise the contents of `resolv_conf`.
pub fn system_nameservers(configured: &[String], resolv_conf: impl AsRef<Path>) -> Vec<SocketAddr> {
    if !configured.is_empty() {
        return configured
            .iter()
            .filter_map(|s| parse_server(s))
            .collect();
    }

    let path = resolv_conf.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let servers = parse_nameservers(&contents);
            debug!(path = %path.display(), servers = servers.len(), "Loaded system nameservers");
            servers
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read resolv.conf");
            Vec::new()
        }
    }
}

/// `ip` or `ip:port`; a bare address gets port 53.
pub fn parse_server(s: &str) -> Option<SocketAddr> {
    let s = s.trim();
    s.parse::<SocketAddr>()
        .ok()
        .or_else(|| s.parse::<IpAddr>().ok().map(|ip| SocketAddr::new(ip, DNS_PORT)))
}
