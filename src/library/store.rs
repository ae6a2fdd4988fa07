//! Library snapshot storage
//!
//! The two libraries live in one immutable snapshot behind a single reference.
//! Writers build a complete replacement and swap it in; readers hold an `Arc`
//! to whichever snapshot was current when they asked, so a partially updated
//! library is never observable.

use crate::spec::{NodeLibrary, NodePackageLibrary, NodePackageSpecification, NodeSpecification};
use crate::utils::current_timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

const SNAPSHOT_FILE: &str = "node_library.json";

/// Snapshot persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Where the current snapshot's contents came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LibrarySource {
    /// Nothing built yet
    #[default]
    Empty,
    /// Remote registry
    Remote,
    /// Bundled catalog, after a failed registry fetch
    Fallback { reason: String },
    /// Loaded from a persisted snapshot
    Persisted,
    /// Set through the per-map accessors
    Manual,
}

/// Immutable view of both libraries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Incremented on every swap
    pub generation: u64,
    /// Unix seconds when the snapshot was created
    pub built_at: u64,
    pub source: LibrarySource,
    pub nodes: NodeLibrary,
    pub packages: NodePackageLibrary,
}

/// Process-wide holder of the current library snapshot
#[derive(Debug, Default)]
pub struct LibraryStore {
    current: RwLock<Arc<LibrarySnapshot>>,
}

impl LibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<LibrarySnapshot> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a snapshot derived from the current one
    fn swap_with<F>(&self, make: F) -> Arc<LibrarySnapshot>
    where
        F: FnOnce(&LibrarySnapshot) -> LibrarySnapshot,
    {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let mut next = make(&guard);
        next.generation = guard.generation + 1;
        next.built_at = current_timestamp();
        let next = Arc::new(next);
        *guard = Arc::clone(&next);
        debug!(
            "Library snapshot {} installed ({} controllers, {} packages)",
            next.generation,
            next.nodes.len(),
            next.packages.len()
        );
        next
    }

    /// Replace both libraries at once
    pub fn replace(
        &self,
        nodes: NodeLibrary,
        packages: NodePackageLibrary,
        source: LibrarySource,
    ) -> Arc<LibrarySnapshot> {
        self.swap_with(move |_| LibrarySnapshot {
            source,
            nodes,
            packages,
            ..LibrarySnapshot::default()
        })
    }

    /// Replace the controller library; no merge with the previous one
    pub fn update_node_library(&self, nodes: NodeLibrary) -> Arc<LibrarySnapshot> {
        self.swap_with(move |current| LibrarySnapshot {
            source: LibrarySource::Manual,
            nodes,
            packages: current.packages.clone(),
            ..LibrarySnapshot::default()
        })
    }

    /// Replace the package library; no merge with the previous one
    pub fn update_node_package_library(
        &self,
        packages: NodePackageLibrary,
    ) -> Arc<LibrarySnapshot> {
        self.swap_with(move |current| LibrarySnapshot {
            source: LibrarySource::Manual,
            nodes: current.nodes.clone(),
            packages,
            ..LibrarySnapshot::default()
        })
    }

    pub fn node_library(&self) -> NodeLibrary {
        self.snapshot().nodes.clone()
    }

    pub fn node_package_library(&self) -> NodePackageLibrary {
        self.snapshot().packages.clone()
    }

    pub fn get_node_spec(&self, spec_id: &str) -> Option<NodeSpecification> {
        self.snapshot().nodes.get(spec_id).cloned()
    }

    pub fn get_package_spec(&self, spec_id: &str) -> Option<NodePackageSpecification> {
        self.snapshot().packages.get(spec_id).cloned()
    }

    /// Save the current snapshot to `<dir>/node_library.json`
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| StoreError::Io(format!("Failed to create library directory: {e}")))?;

        let snapshot = self.snapshot();
        let contents = serde_json::to_string_pretty(snapshot.as_ref())
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize library: {e}")))?;

        // write-then-rename so a crash never leaves a truncated file
        let tmp = dir.join(format!("{SNAPSHOT_FILE}.tmp"));
        std::fs::write(&tmp, contents)
            .map_err(|e| StoreError::Io(format!("Failed to write library file: {e}")))?;
        std::fs::rename(&tmp, dir.join(SNAPSHOT_FILE))
            .map_err(|e| StoreError::Io(format!("Failed to replace library file: {e}")))?;
        Ok(())
    }

    /// Load a store from `<dir>/node_library.json`, empty if there is none
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let file = dir.as_ref().join(SNAPSHOT_FILE);
        if !file.exists() {
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(&file)
            .map_err(|e| StoreError::Io(format!("Failed to read library file: {e}")))?;
        let mut snapshot: LibrarySnapshot = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(format!("Failed to parse library file: {e}")))?;
        snapshot.source = LibrarySource::Persisted;

        Ok(Self {
            current: RwLock::new(Arc::new(snapshot)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, version: &str) -> NodeSpecification {
        NodeSpecification::from_raw(&json!({
            "specId": id,
            "displayName": id.to_uppercase(),
            "version": version
        }))
        .unwrap()
    }

    fn package(id: &str) -> NodePackageSpecification {
        NodePackageSpecification::from_raw(&json!({
            "specId": id,
            "displayName": id,
            "version": "1.0.0"
        }))
        .unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = LibraryStore::new();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.generation, 0);
        assert_eq!(snapshot.source, LibrarySource::Empty);
        assert!(snapshot.nodes.is_empty());
        assert!(store.get_node_spec("geth").is_none());
    }

    #[test]
    fn test_update_node_library_replaces_without_merge() {
        let store = LibraryStore::new();
        store.update_node_library(NodeLibrary::from([
            ("geth".to_string(), node("geth", "1.0.0")),
            ("besu".to_string(), node("besu", "1.0.0")),
        ]));
        store.update_node_library(NodeLibrary::from([(
            "reth".to_string(),
            node("reth", "1.0.0"),
        )]));

        let nodes = store.node_library();
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains_key("reth"));
        assert_eq!(store.snapshot().generation, 2);
    }

    #[test]
    fn test_per_map_updates_keep_the_other_map() {
        let store = LibraryStore::new();
        store.update_node_package_library(NodePackageLibrary::from([(
            "ethereum".to_string(),
            package("ethereum"),
        )]));
        store.update_node_library(NodeLibrary::from([(
            "geth".to_string(),
            node("geth", "1.0.0"),
        )]));

        assert!(store.get_package_spec("ethereum").is_some());
        assert!(store.get_node_spec("geth").is_some());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = LibraryStore::new();
        store.replace(
            NodeLibrary::from([("geth".to_string(), node("geth", "1.0.0"))]),
            NodePackageLibrary::new(),
            LibrarySource::Remote,
        );
        let before = store.snapshot();

        store.replace(
            NodeLibrary::new(),
            NodePackageLibrary::new(),
            LibrarySource::Fallback {
                reason: "offline".to_string(),
            },
        );

        assert!(before.nodes.contains_key("geth"));
        assert_eq!(before.source, LibrarySource::Remote);
        assert!(store.snapshot().nodes.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = LibraryStore::new();
        store.replace(
            NodeLibrary::from([("geth".to_string(), node("geth", "1.2.0"))]),
            NodePackageLibrary::from([("ethereum".to_string(), package("ethereum"))]),
            LibrarySource::Remote,
        );
        store.save(temp_dir.path()).unwrap();

        let loaded = LibraryStore::load(temp_dir.path()).unwrap();
        let snapshot = loaded.snapshot();
        assert_eq!(snapshot.source, LibrarySource::Persisted);
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.nodes["geth"].version.as_str(), "1.2.0");
        assert!(snapshot.packages.contains_key("ethereum"));
    }

    #[test]
    fn test_load_missing_file_gives_empty_store() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = LibraryStore::load(temp_dir.path()).unwrap();
        assert_eq!(store.snapshot().generation, 0);
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SNAPSHOT_FILE), "{]").unwrap();
        assert!(matches!(
            LibraryStore::load(temp_dir.path()),
            Err(StoreError::Serialization(_))
        ));
    }
}
