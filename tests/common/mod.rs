//! Shared test helpers: a scripted registry transport and spec fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use node_spec_library::registry::{JsonTransport, RegistryError};
use node_spec_library::{RegistryClient, RegistryConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://registry.test/api";

/// Transport answering from a fixed URL → response table
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, Result<Value, RegistryError>>>,
    requests: Mutex<Vec<(String, bool)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{BASE_URL}/{path}"), Ok(body));
        self
    }

    pub fn fail(self, path: &str, error: RegistryError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(format!("{BASE_URL}/{path}"), Err(error));
        self
    }

    /// URLs requested so far, with the plaintext flag
    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonTransport for ScriptedTransport {
    async fn get_json(&self, url: &str, plaintext: bool) -> Result<Value, RegistryError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), plaintext));
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Err(RegistryError::Status {
                status: 404,
                url: url.to_string(),
            }))
    }
}

pub fn client(transport: Arc<ScriptedTransport>) -> RegistryClient {
    RegistryClient::new(RegistryConfig::with_base_url(BASE_URL), transport)
}

pub fn controller(spec_id: &str, version: &str) -> Value {
    json!({
        "specId": spec_id,
        "displayName": spec_id.to_uppercase(),
        "version": version,
        "execution": {
            "executionType": "docker",
            "imageName": format!("example/{spec_id}"),
            "defaultImageTag": "stable"
        }
    })
}

pub fn package(spec_id: &str, version: &str) -> Value {
    json!({
        "specId": spec_id,
        "displayName": spec_id.to_uppercase(),
        "version": version,
        "execution": { "executionType": "nodePackage", "services": [] }
    })
}
