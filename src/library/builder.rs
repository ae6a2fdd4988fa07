//! Library builder
//!
//! Rebuilds both libraries from scratch on every call:
//!
//! 1. Fetch packages and controllers from the registry concurrently.
//! 2. If either fetch fails, use the bundled fallback catalog for both.
//! 3. Shape-check each controller, default its config translation and inject
//!    the universal controller settings; shape-check each package.
//! 4. Key both by `specId` (later documents win) and swap them into the store.
//!
//! A malformed document is skipped and reported; it never aborts the build.

use crate::library::fallback::FallbackCatalog;
use crate::library::store::{LibrarySource, LibraryStore};
use crate::registry::RegistryClient;
use crate::spec::{
    inject_default_controller_config, raw_spec_id, NodeLibrary, NodePackageLibrary,
    NodePackageSpecification, NodeSpecification, RawSpec, SpecError,
};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Which library a document was headed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    Controller,
    Package,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::Controller => f.write_str("controller"),
            SpecKind::Package => f.write_str("package"),
        }
    }
}

/// A document that was left out of the library
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub kind: SpecKind,
    /// Position in the source array
    pub index: usize,
    pub spec_id: Option<String>,
    pub error: SpecError,
}

/// Outcome of one rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub source: LibrarySource,
    /// Snapshot generation installed by this build
    pub generation: u64,
    /// Entries in the controller library
    pub controllers: usize,
    /// Entries in the package library
    pub packages: usize,
    pub failures: Vec<ItemFailure>,
}

impl BuildReport {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, LibrarySource::Fallback { .. })
    }
}

fn record_failure(
    failures: &mut Vec<ItemFailure>,
    kind: SpecKind,
    index: usize,
    raw: &RawSpec,
    error: SpecError,
) {
    let spec_id = raw_spec_id(raw).map(str::to_string);
    error!(
        "Skipping {} #{} ({}): {}",
        kind,
        index,
        spec_id.as_deref().unwrap_or("<no specId>"),
        error
    );
    failures.push(ItemFailure {
        kind,
        index,
        spec_id,
        error,
    });
}

/// Build the controller library from raw documents
pub fn build_node_library(items: &[RawSpec]) -> (NodeLibrary, Vec<ItemFailure>) {
    let mut library = NodeLibrary::new();
    let mut failures = Vec::new();

    for (index, raw) in items.iter().enumerate() {
        match NodeSpecification::from_raw(raw) {
            Ok(mut spec) => {
                if spec.config_translation.is_none() {
                    spec.config_translation = Some(Default::default());
                }
                let spec = inject_default_controller_config(&spec);
                if library.insert(spec.spec_id.clone(), spec).is_some() {
                    debug!("Controller #{} replaces an earlier entry with the same specId", index);
                }
            }
            Err(e) => record_failure(&mut failures, SpecKind::Controller, index, raw, e),
        }
    }

    (library, failures)
}

/// Build the package library from raw documents
pub fn build_package_library(items: &[RawSpec]) -> (NodePackageLibrary, Vec<ItemFailure>) {
    let mut library = NodePackageLibrary::new();
    let mut failures = Vec::new();

    for (index, raw) in items.iter().enumerate() {
        match NodePackageSpecification::from_raw(raw) {
            Ok(spec) => {
                if library.insert(spec.spec_id.clone(), spec).is_some() {
                    debug!("Package #{} replaces an earlier entry with the same specId", index);
                }
            }
            Err(e) => record_failure(&mut failures, SpecKind::Package, index, raw, e),
        }
    }

    (library, failures)
}

/// Builds the controller and package libraries into a [`LibraryStore`]
pub struct LibraryBuilder {
    client: RegistryClient,
    store: Arc<LibraryStore>,
    fallback: FallbackCatalog,
    persist_dir: Option<PathBuf>,
}

impl LibraryBuilder {
    /// Create a builder using the bundled fallback catalog
    pub fn new(client: RegistryClient, store: Arc<LibraryStore>) -> Self {
        Self {
            client,
            store,
            fallback: FallbackCatalog::bundled(),
            persist_dir: None,
        }
    }

    /// Use a different fallback catalog
    pub fn with_fallback(mut self, fallback: FallbackCatalog) -> Self {
        self.fallback = fallback;
        self
    }

    /// Persist every new snapshot into `dir`
    pub fn with_persist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.persist_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &Arc<LibraryStore> {
        &self.store
    }

    /// Build the libraries once at startup
    pub async fn initialize(&self) -> BuildReport {
        self.update_local_node_and_package_library().await
    }

    /// Rebuild both libraries, remote first with all-or-nothing fallback
    ///
    /// Registry failures degrade to the bundled catalog and are only logged.
    /// Callers should not run two rebuilds at the same time.
    pub async fn update_local_node_and_package_library(&self) -> BuildReport {
        let (source, packages, controllers) = match self.client.fetch_all().await {
            Ok((packages, controllers)) => {
                info!(
                    "Registry returned {} packages and {} controllers",
                    packages.len(),
                    controllers.len()
                );
                (LibrarySource::Remote, packages, controllers)
            }
            Err(e) => {
                error!("Failed to fetch specifications from the registry: {}", e);
                warn!("Falling back to the bundled specification catalog");
                (
                    LibrarySource::Fallback {
                        reason: e.to_string(),
                    },
                    self.fallback.packages.clone(),
                    self.fallback.controllers.clone(),
                )
            }
        };

        let (nodes, mut failures) = build_node_library(&controllers);
        let (packages, package_failures) = build_package_library(&packages);
        failures.extend(package_failures);

        let snapshot = self.store.replace(nodes, packages, source.clone());

        if let Some(dir) = &self.persist_dir {
            if let Err(e) = self.store.save(dir) {
                warn!("Failed to persist library snapshot to {:?}: {}", dir, e);
            }
        }

        info!(
            "Library {} built: {} controllers, {} packages, {} skipped",
            snapshot.generation,
            snapshot.nodes.len(),
            snapshot.packages.len(),
            failures.len()
        );

        BuildReport {
            source,
            generation: snapshot.generation,
            controllers: snapshot.nodes.len(),
            packages: snapshot.packages.len(),
            failures,
        }
    }
}
