//! Node and package libraries
//!
//! Builds the keyed controller and package libraries from the registry (or
//! the bundled fallback catalog) and holds the current snapshot.

pub mod builder;
pub mod fallback;
pub mod store;

pub use builder::{BuildReport, ItemFailure, LibraryBuilder, SpecKind};
pub use fallback::FallbackCatalog;
pub use store::{LibrarySnapshot, LibrarySource, LibraryStore, StoreError};
