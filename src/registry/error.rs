//! Registry-specific error types

use thiserror::Error;

/// Registry operation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Registry returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Malformed registry payload: {0}")]
    MalformedPayload(String),

    #[error("Sanity check failed: {0}")]
    SanityCheckFailed(String),

    #[error("Invalid specification from registry: {0}")]
    InvalidSpec(String),
}

impl RegistryError {
    /// Whether the failure came from the transport rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, RegistryError::Network(_) | RegistryError::Status { .. })
    }
}
