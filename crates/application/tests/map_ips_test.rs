use std::sync::Arc;
use subrecon_application::services::ReverseLookupService;
use subrecon_application::use_cases::{MapIpsToDomainsUseCase, ReverseSettings};
use subrecon_domain::{DomainError, RecordType};

mod helpers;
use helpers::{MockCache, MockCertificateSearch, MockDnsLookup, MockRateLimiter};

fn use_case(dns: Arc<MockDnsLookup>, limiter: MockRateLimiter) -> MapIpsToDomainsUseCase {
    let reverse = Arc::new(ReverseLookupService::new(
        dns,
        Arc::new(MockCertificateSearch::new()),
        Arc::new(MockCache::new()),
    ));
    MapIpsToDomainsUseCase::new(reverse, Arc::new(limiter))
}

fn inputs(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_results_follow_input_order() {
    // Arrange
    let dns = Arc::new(MockDnsLookup::new());
    dns.set_names("2.0.0.10.in-addr.arpa", RecordType::PTR, &["two.example.com"])
        .await;
    let use_case = use_case(dns, MockRateLimiter::allowing());

    // Act
    let report = use_case
        .execute("cli", &inputs(&["10.0.0.2", "garbage", "10.0.0.1", "10.0.0.2"]))
        .await
        .unwrap();

    // Assert
    let ips: Vec<&str> = report.results.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.0.2", "10.0.0.1"]);
    assert_eq!(report.total, 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.skipped, vec!["garbage".to_string()]);
    assert_eq!(report.results[0].hostnames, vec!["two.example.com".to_string()]);
}

#[tokio::test]
async fn test_input_is_truncated_to_max_ips() {
    let dns = Arc::new(MockDnsLookup::new());
    let use_case = use_case(dns, MockRateLimiter::allowing()).with_settings(ReverseSettings {
        max_ips: 2,
        ..ReverseSettings::default()
    });

    let report = use_case
        .execute("cli", &inputs(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]))
        .await
        .unwrap();

    assert_eq!(report.total, 2);
}

#[tokio::test]
async fn test_text_input_extracts_route_lines() {
    let dns = Arc::new(MockDnsLookup::new());
    let use_case = use_case(dns, MockRateLimiter::allowing());

    let report = use_case
        .execute_text("cli", "route add 10.1.0.1 mask 255.255.255.255 0.0.0.0\n10.1.0.2\n")
        .await
        .unwrap();

    let ips: Vec<&str> = report.results.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.1.0.1", "10.1.0.2"]);
}

#[tokio::test]
async fn test_no_valid_addresses_is_an_error() {
    let use_case = use_case(Arc::new(MockDnsLookup::new()), MockRateLimiter::allowing());

    let result = use_case.execute("cli", &inputs(&["nope", ""])).await;

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[tokio::test]
async fn test_reverse_bucket_is_rate_limited() {
    let use_case = use_case(Arc::new(MockDnsLookup::new()), MockRateLimiter::denying());

    let result = use_case.execute("cli", &inputs(&["10.0.0.1"])).await;

    assert!(matches!(
        result,
        Err(DomainError::RateLimited { ref bucket, .. }) if bucket == "reverse"
    ));
}
