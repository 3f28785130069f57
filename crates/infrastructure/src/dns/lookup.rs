use super::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use super::transport::Transport;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::time::Duration;
use subrecon_application::ports::{DnsAnswer, DnsLookup};
use subrecon_domain::{DomainError, RecordType};
use tracing::debug;

/// Wire-level `DnsLookup`: UDP first, TCP when the answer comes back truncated.
pub struct HickoryDnsLookup {
    system_servers: Vec<SocketAddr>,
}

impl HickoryDnsLookup {
    pub fn new(system_servers: Vec<SocketAddr>) -> Self {
        Self { system_servers }
    }

    pub fn system_servers(&self) -> &[SocketAddr] {
        &self.system_servers
    }

    async fn query_server(
        &self,
        name: &str,
        record_type: RecordType,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<DnsResponse, DomainError> {
        let query = MessageBuilder::encode(name, &record_type)?;

        let udp = Transport::udp(server);
        let response = udp.send(&query.bytes, timeout).await?;
        let mut parsed = ResponseParser::parse(&response.bytes)?;

        if parsed.truncated {
            debug!(name = %name, server = %server, "Truncated UDP answer, retrying over TCP");
            let tcp = Transport::tcp(server);
            let response = tcp.send(&query.bytes, timeout).await?;
            parsed = ResponseParser::parse(&response.bytes)?;
        }

        if !query.matches(parsed.id) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id {} does not match query id {}",
                parsed.id, query.id
            )));
        }

        Ok(parsed)
    }
}

fn into_answer(response: DnsResponse, record_type: RecordType) -> DnsAnswer {
    let mut names = response.names;
    if record_type == RecordType::ANY {
        names.extend(response.owners);
    }

    let mut seen = BTreeSet::new();
    names.retain(|n| seen.insert(n.to_lowercase()));

    DnsAnswer {
        addresses: response.addresses,
        names,
    }
}

#[async_trait]
impl DnsLookup for HickoryDnsLookup {
    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
        server: Option<SocketAddr>,
        timeout: Duration,
    ) -> Result<DnsAnswer, DomainError> {
        let servers: Vec<SocketAddr> = match server {
            Some(s) => vec![s],
            None => self.system_servers.clone(),
        };

        let mut last_error = None;
        for server in servers {
            match self.query_server(name, record_type, server, timeout).await {
                Ok(response) if response.is_nxdomain() => return Ok(DnsAnswer::default()),
                Ok(response) if response.is_server_error() => {
                    last_error = Some(DomainError::Transport {
                        target: server.to_string(),
                        message: ResponseParser::rcode_to_status(response.rcode).to_string(),
                    });
                }
                Ok(response) => return Ok(into_answer(response, record_type)),
                Err(e) => {
                    debug!(name = %name, server = %server, error = %e, "DNS query failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::BackendUnavailable("no DNS servers configured".to_string())
        }))
    }
}
