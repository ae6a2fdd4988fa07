//! Node state store interface

use crate::node::{Node, NodeId};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Node persistence errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeStoreError {
    #[error("Node storage error: {0}")]
    Storage(String),
}

/// Access to persisted node records
///
/// `update_node` persists every field of the record it is given.
pub trait NodeStateStore: Send + Sync {
    /// Look up a node, `None` if unknown
    fn get_node(&self, node_id: &NodeId) -> Option<Node>;

    fn update_node(&self, node: &Node) -> Result<(), NodeStoreError>;
}

/// Node store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryNodeStore {
    nodes: RwLock<HashMap<NodeId, Node>>,
}

impl InMemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a node
    pub fn insert(&self, node: Node) {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        nodes.insert(node.node_id.clone(), node);
    }

    pub fn len(&self) -> usize {
        self.nodes.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NodeStateStore for InMemoryNodeStore {
    fn get_node(&self, node_id: &NodeId) -> Option<Node> {
        let nodes = self.nodes.read().unwrap_or_else(|e| e.into_inner());
        nodes.get(node_id).cloned()
    }

    fn update_node(&self, node: &Node) -> Result<(), NodeStoreError> {
        let mut nodes = self.nodes.write().unwrap_or_else(|e| e.into_inner());
        match nodes.get_mut(&node.node_id) {
            Some(existing) => {
                *existing = node.clone();
                Ok(())
            }
            None => Err(NodeStoreError::Storage(format!(
                "Node {} does not exist",
                node.node_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::NodeSpecification;
    use serde_json::json;

    fn geth() -> NodeSpecification {
        NodeSpecification::from_raw(&json!({
            "specId": "geth",
            "displayName": "Geth",
            "version": "1.0.0"
        }))
        .unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let store = InMemoryNodeStore::new();
        assert!(store.is_empty());

        let node = Node::new(geth()).with_id("node-1");
        store.insert(node.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_node(&NodeId::from("node-1")), Some(node));
        assert_eq!(store.get_node(&NodeId::from("node-2")), None);
    }

    #[test]
    fn test_update_existing_node() {
        let store = InMemoryNodeStore::new();
        let mut node = Node::new(geth());
        store.insert(node.clone());

        node.update_available = true;
        store.update_node(&node).unwrap();
        assert!(store.get_node(&node.node_id).unwrap().update_available);
    }

    #[test]
    fn test_update_unknown_node_fails() {
        let store = InMemoryNodeStore::new();
        let node = Node::new(geth());
        assert!(matches!(
            store.update_node(&node),
            Err(NodeStoreError::Storage(_))
        ));
    }
}
