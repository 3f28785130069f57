use async_trait::async_trait;
use subrecon_domain::DomainError;

/// Downloads newline-delimited text lists.
#[async_trait]
pub trait RemoteListSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, DomainError>;
}
