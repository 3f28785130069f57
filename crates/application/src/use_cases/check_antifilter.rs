use crate::services::AntifilterService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use subrecon_domain::{normalize_host, DomainError};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntifilterVerdict {
    pub host: String,
    pub ips: Vec<String>,
    pub listed: bool,
}

pub struct CheckAntifilterUseCase {
    antifilter: Arc<AntifilterService>,
}

impl CheckAntifilterUseCase {
    pub fn new(antifilter: Arc<AntifilterService>) -> Self {
        Self { antifilter }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, host: &str, ips: &[String]) -> Result<AntifilterVerdict, DomainError> {
        let host = normalize_host(host)?;
        let listed = self.antifilter.check_membership(&host, ips).await;

        info!(host = %host, listed, "Antifilter membership checked");

        Ok(AntifilterVerdict {
            host,
            ips: ips.to_vec(),
            listed,
        })
    }
}
