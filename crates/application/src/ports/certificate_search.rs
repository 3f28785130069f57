use async_trait::async_trait;
use serde::Deserialize;
use subrecon_domain::DomainError;

/// Name fields of one certificate-transparency log entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CertificateNames {
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub name_value: Option<String>,
}

#[async_trait]
pub trait CertificateSearch: Send + Sync {
    /// Full-text search of CT logs (an IP address or a domain).
    async fn search(&self, query: &str) -> Result<Vec<CertificateNames>, DomainError>;
}
