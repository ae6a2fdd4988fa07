//! Installed nodes
//!
//! A node is an installed instance of a controller specification. Node records
//! are owned by an external state store; this crate only reads them and
//! writes back the `update_available` flag.

pub mod store;
pub mod update;

use crate::spec::NodeSpecification;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub use store::{InMemoryNodeStore, NodeStateStore, NodeStoreError};
pub use update::{UpdateError, UpdateResolver};

/// Node identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Random identifier for a new node
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Installed node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "id")]
    pub node_id: NodeId,
    /// Specification the node was installed from
    pub spec: NodeSpecification,
    #[serde(default)]
    pub update_available: bool,
    /// Fields owned by other parts of the application (config, runtime, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// New node record for `spec`, with a fresh id
    pub fn new(spec: NodeSpecification) -> Self {
        Self {
            node_id: NodeId::generate(),
            spec,
            update_available: false,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, node_id: impl Into<NodeId>) -> Self {
        self.node_id = node_id.into();
        self
    }
}
