//! Bundled fallback catalog
//!
//! A fixed set of specification documents compiled into the binary. It is used
//! verbatim, as a whole, whenever the registry cannot be trusted or reached.

use crate::spec::{raw_spec_id, RawSpec, SpecError};
use tracing::error;

/// A specification document embedded at build time
#[derive(Debug, Clone, Copy)]
pub struct BundledSpec {
    /// Path relative to the crate root
    pub path: &'static str,
    pub contents: &'static str,
}

impl BundledSpec {
    pub fn parse(&self) -> Result<RawSpec, SpecError> {
        let raw: RawSpec = serde_json::from_str(self.contents)
            .map_err(|e| SpecError::Malformed(format!("{}: {e}", self.path)))?;
        if raw_spec_id(&raw).is_none() {
            return Err(SpecError::MissingSpecId);
        }
        Ok(raw)
    }
}

macro_rules! bundled {
    ($id:literal) => {
        BundledSpec {
            path: concat!("specs/", $id, "/", $id, "-v1.0.0.json"),
            contents: include_str!(concat!("../../specs/", $id, "/", $id, "-v1.0.0.json")),
        }
    };
}

/// Bundled packages, in catalog order
pub const BUNDLED_PACKAGES: &[BundledSpec] = &[
    bundled!("ethereum"),
    bundled!("farcaster"),
    bundled!("arbitrum"),
    bundled!("optimism"),
    bundled!("base"),
    bundled!("minecraft"),
    bundled!("home-assistant"),
];

/// Bundled controllers, in catalog order
///
/// The arbitrum package document is listed here as well and ends up in both
/// libraries.
pub const BUNDLED_CONTROLLERS: &[BundledSpec] = &[
    bundled!("besu"),
    bundled!("nethermind"),
    bundled!("erigon"),
    bundled!("geth"),
    bundled!("reth"),
    bundled!("lodestar"),
    bundled!("nimbus"),
    bundled!("teku"),
    bundled!("lighthouse"),
    bundled!("prysm"),
    bundled!("arbitrum"),
    bundled!("nitro"),
    bundled!("pathfinder"),
    bundled!("op-geth"),
    bundled!("op-node"),
    bundled!("hildr"),
    bundled!("magi"),
    bundled!("hubble"),
    bundled!("itzg-minecraft"),
    bundled!("home-assistant-service"),
];

/// Controller and package documents used when the registry fetch fails
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackCatalog {
    pub packages: Vec<RawSpec>,
    pub controllers: Vec<RawSpec>,
}

fn parse_all(bundle: &[BundledSpec]) -> Vec<RawSpec> {
    bundle
        .iter()
        .filter_map(|spec| match spec.parse() {
            Ok(raw) => Some(raw),
            Err(e) => {
                error!("Bundled specification {} is unusable: {}", spec.path, e);
                None
            }
        })
        .collect()
}

impl FallbackCatalog {
    /// The catalog shipped with the crate
    pub fn bundled() -> Self {
        Self {
            packages: parse_all(BUNDLED_PACKAGES),
            controllers: parse_all(BUNDLED_CONTROLLERS),
        }
    }

    /// A custom catalog (tests, embedders shipping their own set)
    pub fn new(packages: Vec<RawSpec>, controllers: Vec<RawSpec>) -> Self {
        Self {
            packages,
            controllers,
        }
    }
}
