//! Remote specification registry client
//!
//! The collection endpoints carry a trust sanity check: the packages list must
//! contain the `ethereum` package and the controllers list the `geth`
//! controller. A payload without them (empty, or from an unrelated service)
//! is rejected as a whole.

use crate::config::RegistryConfig;
use crate::registry::error::RegistryError;
use crate::registry::transport::{HttpTransport, JsonTransport};
use crate::spec::{raw_spec_id, NodeSpecification, RawSpec};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Installable packages collection
pub const PACKAGES_PATH: &str = "controllerPackage";

/// Runnable controllers collection (and `controller/<specId>` for one item)
pub const CONTROLLERS_PATH: &str = "controller";

/// Package that must be present in a trusted packages payload
pub const SANITY_PACKAGE_ID: &str = "ethereum";

/// Controller that must be present in a trusted controllers payload
pub const SANITY_CONTROLLER_ID: &str = "geth";

/// Registry client
#[derive(Clone)]
pub struct RegistryClient {
    config: RegistryConfig,
    transport: Arc<dyn JsonTransport>,
}

impl RegistryClient {
    /// Create a client over an explicit transport
    pub fn new(config: RegistryConfig, transport: Arc<dyn JsonTransport>) -> Self {
        Self { config, transport }
    }

    /// Create a client over HTTP
    pub fn http(config: RegistryConfig) -> Result<Self, RegistryError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    async fn get(&self, path: &str) -> Result<Value, RegistryError> {
        let url = self.config.endpoint(path);
        let body = self
            .transport
            .get_json(&url, self.config.plaintext())
            .await?;
        check_error_field(&body)?;
        Ok(body)
    }

    async fn get_collection(
        &self,
        path: &str,
        required_id: &str,
    ) -> Result<Vec<RawSpec>, RegistryError> {
        let body = self.get(path).await?;
        let items = match body {
            Value::Array(items) => items,
            other => {
                return Err(RegistryError::MalformedPayload(format!(
                    "{path}: expected an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        if !items.iter().any(|item| raw_spec_id(item) == Some(required_id)) {
            return Err(RegistryError::SanityCheckFailed(format!(
                "{required_id} not found in the {path} collection"
            )));
        }

        info!("Fetched {} items from {}", items.len(), path);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let payload = serde_json::Value::Array(items.clone());
            debug!("{} payload: {}", path, payload);
        }
        Ok(items)
    }

    /// Fetch the packages collection
    pub async fn fetch_packages(&self) -> Result<Vec<RawSpec>, RegistryError> {
        self.get_collection(PACKAGES_PATH, SANITY_PACKAGE_ID).await
    }

    /// Fetch the controllers collection
    pub async fn fetch_controllers(&self) -> Result<Vec<RawSpec>, RegistryError> {
        self.get_collection(CONTROLLERS_PATH, SANITY_CONTROLLER_ID).await
    }

    /// Fetch both collections concurrently, as `(packages, controllers)`
    ///
    /// Both results are awaited; a failure of either fails the whole call.
    pub async fn fetch_all(&self) -> Result<(Vec<RawSpec>, Vec<RawSpec>), RegistryError> {
        let (packages, controllers) =
            tokio::join!(self.fetch_packages(), self.fetch_controllers());
        Ok((packages?, controllers?))
    }

    /// Fetch a single controller by `specId`
    pub async fn fetch_controller(
        &self,
        spec_id: &str,
    ) -> Result<NodeSpecification, RegistryError> {
        let path = format!("{CONTROLLERS_PATH}/{spec_id}");
        let body = self.get(&path).await?;
        let spec = NodeSpecification::from_raw(&body)
            .map_err(|e| RegistryError::InvalidSpec(format!("{spec_id}: {e}")))?;
        if spec.spec_id != spec_id {
            return Err(RegistryError::InvalidSpec(format!(
                "requested {spec_id}, registry returned {}",
                spec.spec_id
            )));
        }
        Ok(spec)
    }
}

/// Reject bodies of the form `{"error": "..."}` regardless of HTTP status
fn check_error_field(body: &Value) -> Result<(), RegistryError> {
    match body.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(msg)) if msg.is_empty() => Ok(()),
        Some(Value::String(msg)) => Err(RegistryError::Registry(msg.clone())),
        Some(Value::Bool(false)) => Ok(()),
        Some(other) => Err(RegistryError::Registry(other.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
