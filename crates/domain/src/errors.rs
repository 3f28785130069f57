use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("Timeout after {timeout:?} talking to {target}")]
    TransportTimeout { target: String, timeout: Duration },

    #[error("Transport error ({target}): {message}")]
    Transport { target: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("Rate limit exceeded for {client} on bucket '{bucket}'")]
    RateLimited { client: String, bucket: String },
}

impl DomainError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DomainError::TransportTimeout { .. }
            | DomainError::Transport { .. }
            | DomainError::TaskFailed(_) => true,
            DomainError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
