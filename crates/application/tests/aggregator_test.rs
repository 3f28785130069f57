use chrono::{Duration as ChronoDuration, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use subrecon_application::services::Aggregator;
use subrecon_domain::{SourceRecord, SubdomainEntry};

mod helpers;
use helpers::MockCache;

fn observation(host: &str, source: &str) -> SubdomainEntry {
    SubdomainEntry::observed(host, SourceRecord::new(source, Utc::now()))
}

// ============================================================================
// Tests: single writer
// ============================================================================

#[tokio::test]
async fn test_upsert_stores_normalized_host() {
    // Arrange
    let cache = Arc::new(MockCache::new());
    let aggregator = Aggregator::new(cache.clone());

    // Act
    let stored = aggregator
        .upsert(observation("WWW.Example.COM.", "crtsh"))
        .await
        .unwrap();

    // Assert
    assert_eq!(stored.host, "www.example.com");
    assert!(cache.contains("entry:www.example.com").await);
    assert_eq!(aggregator.in_flight_len(), 0);
}

#[tokio::test]
async fn test_upsert_merges_with_previous_scan() {
    // Arrange
    let cache = Arc::new(MockCache::new());
    let aggregator = Aggregator::new(cache.clone());
    let earlier = Utc::now() - ChronoDuration::hours(2);
    aggregator
        .upsert(
            SubdomainEntry::observed("api.example.com", SourceRecord::new("crtsh", earlier))
                .with_ips(["10.0.0.1"]),
        )
        .await
        .unwrap();

    // Act
    let merged = aggregator
        .upsert(observation("api.example.com", "dns-bruteforce").with_ips(["10.0.0.2"]))
        .await
        .unwrap();

    // Assert
    assert_eq!(merged.ips.len(), 2);
    assert_eq!(
        merged.source_names().collect::<Vec<_>>(),
        vec!["crtsh", "dns-bruteforce"]
    );
    assert_eq!(merged.first_seen, Some(earlier));
    assert!(merged.last_seen.unwrap() > earlier);
}

#[tokio::test]
async fn test_ttl_is_passed_to_cache() {
    // Arrange
    let cache = Arc::new(MockCache::new());
    let aggregator = Aggregator::new(cache.clone()).with_ttl(Duration::from_secs(3600));

    // Act
    aggregator.upsert(observation("a.example.com", "crtsh")).await.unwrap();

    // Assert
    assert_eq!(
        cache.ttl_of("entry:a.example.com").await,
        Some(Duration::from_secs(3600))
    );
}

#[tokio::test]
async fn test_upsert_rejects_empty_host() {
    let aggregator = Aggregator::new(Arc::new(MockCache::new()));

    let result = aggregator.upsert(observation("  ", "crtsh")).await;

    assert!(result.is_err());
}

// ============================================================================
// Tests: concurrent writers
// ============================================================================

#[tokio::test]
async fn test_concurrent_upserts_same_host_lose_nothing() {
    // Arrange
    let cache = Arc::new(MockCache::new());
    let aggregator = Arc::new(Aggregator::new(cache.clone()));
    let sources: Vec<String> = (0..20).map(|i| format!("feed-{:02}", i)).collect();

    // Act
    let writes = sources.iter().enumerate().map(|(i, source)| {
        let aggregator = aggregator.clone();
        let entry = observation("www.example.com", source).with_ips([format!("10.0.0.{}", i)]);
        async move { aggregator.upsert(entry).await }
    });
    let results = join_all(writes).await;

    // Assert
    assert!(results.iter().all(Result::is_ok));
    let stored = aggregator.get("www.example.com").await.unwrap().unwrap();
    assert_eq!(stored.sources.len(), 20);
    assert_eq!(stored.ips.len(), 20);
    assert_eq!(aggregator.in_flight_len(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_upserts_across_tasks() {
    // Arrange
    let cache = Arc::new(MockCache::new());
    let aggregator = Arc::new(Aggregator::new(cache));

    // Act
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let aggregator = aggregator.clone();
            tokio::spawn(async move {
                let host = if i % 2 == 0 { "even.example.com" } else { "odd.example.com" };
                aggregator
                    .upsert(observation(host, &format!("feed-{}", i)))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Assert
    let even = aggregator.get("even.example.com").await.unwrap().unwrap();
    let odd = aggregator.get("odd.example.com").await.unwrap().unwrap();
    assert_eq!(even.sources.len(), 8);
    assert_eq!(odd.sources.len(), 8);
    assert_eq!(aggregator.in_flight_len(), 0);
}
