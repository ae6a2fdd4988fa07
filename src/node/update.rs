//! Controller update resolution
//!
//! Checks an installed node against the registry's latest specification for
//! the same `specId` and records the answer on the node.

use crate::node::store::{NodeStateStore, NodeStoreError};
use crate::node::NodeId;
use crate::registry::{RegistryClient, RegistryError};
use crate::spec::NodeSpecification;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Update check errors
///
/// Distinct from "no update available", which is `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateError {
    #[error("Failed to fetch latest controller: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to save node: {0}")]
    Store(#[from] NodeStoreError),
}

/// Decides whether installed nodes have newer specifications
///
/// Checks for different nodes may run concurrently; checks for the same node
/// should be serialized by the caller.
pub struct UpdateResolver {
    client: RegistryClient,
    nodes: Arc<dyn NodeStateStore>,
}

impl UpdateResolver {
    pub fn new(client: RegistryClient, nodes: Arc<dyn NodeStateStore>) -> Self {
        Self { client, nodes }
    }

    /// Check one node for a newer controller specification
    ///
    /// Returns the latest specification when its version is strictly greater
    /// than the installed one, `None` otherwise. A known node always has its
    /// `update_available` flag written back; an unknown node is logged and
    /// left alone.
    pub async fn get_check_for_controller_update(
        &self,
        node_id: &NodeId,
    ) -> Result<Option<NodeSpecification>, UpdateError> {
        let Some(mut node) = self.nodes.get_node(node_id) else {
            error!("Update check: node {} not found", node_id);
            return Ok(None);
        };

        let latest = self.client.fetch_controller(&node.spec.spec_id).await?;
        info!(
            "Latest {} controller is version {} (installed {})",
            latest.spec_id, latest.version, node.spec.version
        );

        if latest.version > node.spec.version {
            info!("Node {} has an update available", node.spec.display_name);
            node.update_available = true;
            self.nodes.update_node(&node)?;
            return Ok(Some(latest));
        }

        info!(
            "Node {} does not have an update available",
            node.spec.display_name
        );
        node.update_available = false;
        self.nodes.update_node(&node)?;
        Ok(None)
    }
}
