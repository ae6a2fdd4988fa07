//! Specification registry access
//!
//! Fetches controller and package specifications from the remote registry
//! over a pluggable JSON transport, with identity-based sanity checks on the
//! collection endpoints.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{RegistryClient, CONTROLLERS_PATH, PACKAGES_PATH};
pub use error::RegistryError;
pub use transport::{HttpTransport, JsonTransport};
