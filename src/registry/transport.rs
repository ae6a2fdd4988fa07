//! JSON transport used for all registry requests

use crate::config::RegistryConfig;
use crate::registry::error::RegistryError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Performs a JSON GET and returns the parsed body
///
/// Any transport failure (unreachable host, non-2xx status, body that is not
/// JSON) is an error; what the body means is up to the caller.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn get_json(&self, url: &str, plaintext: bool) -> Result<Value, RegistryError>;
}

/// Rewrite `https://` to `http://` when plaintext transport is requested
pub fn effective_url(url: &str, plaintext: bool) -> String {
    match url.strip_prefix("https://") {
        Some(rest) if plaintext => format!("http://{rest}"),
        _ => url.to_string(),
    }
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    tls_client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the configured request timeout
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let timeout = Duration::from_secs(config.request_timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to build HTTP client: {e}")))?;
        let tls_client = reqwest::Client::builder()
            .timeout(timeout)
            .https_only(true)
            .build()
            .map_err(|e| RegistryError::Network(format!("Failed to build HTTPS client: {e}")))?;
        Ok(Self { client, tls_client })
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn get_json(&self, url: &str, plaintext: bool) -> Result<Value, RegistryError> {
        let url = effective_url(url, plaintext);
        let client = if plaintext { &self.client } else { &self.tls_client };
        debug!("GET {}", url);

        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RegistryError::Network(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RegistryError::MalformedPayload(format!("{url}: {e}")))
    }
}
