use async_trait::async_trait;

/// One passive OSINT provider.
///
/// Implementations convert every provider-side failure into an empty list.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_names(&self, domain: &str) -> Vec<String>;
}
