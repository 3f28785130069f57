//! Host canonicalization.
//!
//! Every other component receives hosts that already went through
//! [`normalize_host`]: ASCII (punycode), lowercase, no scheme, port or path,
//! and no leading or trailing dot.

use crate::errors::DomainError;
use url::Url;

const MAX_HOST_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

/// Reduces a free-form host or URL string to a canonical host.
pub fn normalize_host(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("empty host".to_string()));
    }

    if let Some(host) = parse_as_url(trimmed) {
        return Ok(host);
    }

    fallback_host(trimmed).ok_or_else(|| {
        DomainError::InvalidInput(format!("unable to normalize host '{}'", trimmed))
    })
}

/// True when `host` reduces to a registrable domain under the public suffix list.
pub fn is_valid_host(host: &str) -> bool {
    let cleaned = host.trim().to_lowercase();
    if cleaned.is_empty() || cleaned.chars().any(char::is_whitespace) {
        return false;
    }

    let ascii = match idna::domain_to_ascii(&cleaned) {
        Ok(a) => a,
        Err(_) => return false,
    };
    if ascii.is_empty() || ascii.len() > MAX_HOST_LEN {
        return false;
    }

    if !ascii.split('.').all(is_valid_label) {
        return false;
    }

    psl::domain_str(&ascii).is_some()
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn has_scheme(s: &str) -> bool {
    let Some(idx) = s.find("://") else {
        return false;
    };
    let scheme = &s[..idx];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn parse_as_url(s: &str) -> Option<String> {
    let candidate = if has_scheme(s) {
        s.to_string()
    } else {
        format!("http://{}", s)
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?;
    to_canonical(host)
}

/// Handles inputs the URL parser rejects, e.g. `example.com:8080/path` with odd characters.
fn fallback_host(s: &str) -> Option<String> {
    let without_path = s.split('/').next()?;
    let host = match without_path.rsplit_once(':') {
        Some((h, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => without_path,
    };

    if host.is_empty() || host.contains(' ') || host.contains(':') {
        return None;
    }
    to_canonical(host)
}

fn to_canonical(host: &str) -> Option<String> {
    let ascii = idna::domain_to_ascii(host).ok()?.to_lowercase();
    let stripped = ascii.trim_matches('.');
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Splits a canonical host into its registrable domain and the remaining subdomain labels.
pub fn split_registrable(host: &str) -> (Option<String>, Option<String>) {
    match psl::domain_str(host) {
        Some(domain) => {
            let sub = host
                .strip_suffix(domain)
                .map(|s| s.trim_end_matches('.'))
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            (Some(domain.to_string()), sub)
        }
        None => (None, None),
    }
}

/// True when `host` equals `domain` or sits underneath it.
pub fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}
