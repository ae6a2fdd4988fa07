//! Node Specification Library
//!
//! Maintains a local, versioned catalog of node specifications (blockchain
//! clients, home automation hubs, game servers) that an orchestrating
//! application installs and runs in containers, and detects when an installed
//! node has a newer specification available.
//!
//! ## Data flow
//!
//! 1. [`registry::RegistryClient`] fetches packages and controllers from the
//!    remote registry
//! 2. [`library::FallbackCatalog`] stands in when the registry fails
//! 3. [`spec::inject_default_controller_config`] normalizes every controller
//! 4. [`library::LibraryBuilder`] keys both collections by `specId` and swaps
//!    them into the [`library::LibraryStore`]
//! 5. [`node::UpdateResolver`] compares installed nodes against the registry
//!
//! ## Design Principles
//!
//! 1. **Usable offline**: registry failures degrade to the bundled catalog
//! 2. **All or nothing**: remote and bundled results are never mixed
//! 3. **Snapshots**: readers never observe a half-built library

pub mod config;
pub mod library;
pub mod node;
pub mod registry;
pub mod spec;
pub mod utils;

pub use config::{LibraryConfig, LoggingConfig, RegistryConfig, StoreConfig};
pub use library::{BuildReport, LibraryBuilder, LibrarySnapshot, LibrarySource, LibraryStore};
pub use node::{InMemoryNodeStore, Node, NodeId, NodeStateStore, UpdateError, UpdateResolver};
pub use registry::{RegistryClient, RegistryError};
pub use spec::{
    NodeLibrary, NodePackageLibrary, NodePackageSpecification, NodeSpecification, SpecVersion,
};

use std::sync::Arc;
use tracing::warn;

/// Library manager tying the registry, the library store and node state together
pub struct NodeLibraryManager {
    builder: LibraryBuilder,
    resolver: UpdateResolver,
}

impl NodeLibraryManager {
    /// Create a manager over HTTP from configuration
    ///
    /// When a persist directory is configured, the last saved snapshot is
    /// loaded so the library is usable before the first rebuild.
    pub fn new(config: &LibraryConfig, nodes: Arc<dyn NodeStateStore>) -> anyhow::Result<Self> {
        let client = RegistryClient::http(config.registry.clone())?;
        Ok(Self::with_client(client, config, nodes))
    }

    /// Create a manager over an existing registry client
    pub fn with_client(
        client: RegistryClient,
        config: &LibraryConfig,
        nodes: Arc<dyn NodeStateStore>,
    ) -> Self {
        let store = match &config.store.persist_dir {
            Some(dir) => LibraryStore::load(dir).unwrap_or_else(|e| {
                warn!("Ignoring persisted library in {:?}: {}", dir, e);
                LibraryStore::new()
            }),
            None => LibraryStore::new(),
        };

        let mut builder = LibraryBuilder::new(client.clone(), Arc::new(store));
        if let Some(dir) = &config.store.persist_dir {
            builder = builder.with_persist_dir(dir.clone());
        }

        Self {
            builder,
            resolver: UpdateResolver::new(client, nodes),
        }
    }

    /// Build the libraries once at startup
    pub async fn initialize(&self) -> BuildReport {
        self.builder.initialize().await
    }

    /// Rebuild both libraries (see [`LibraryBuilder`])
    pub async fn update_local_node_and_package_library(&self) -> BuildReport {
        self.builder.update_local_node_and_package_library().await
    }

    /// Check a node for a newer controller (see [`UpdateResolver`])
    pub async fn get_check_for_controller_update(
        &self,
        node_id: &NodeId,
    ) -> Result<Option<NodeSpecification>, UpdateError> {
        self.resolver.get_check_for_controller_update(node_id).await
    }

    /// Library store
    pub fn store(&self) -> &Arc<LibraryStore> {
        self.builder.store()
    }
}
