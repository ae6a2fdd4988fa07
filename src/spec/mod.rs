//! Node specification types
//!
//! A node specification describes one runnable service (a "controller") or an
//! installable bundle of controllers (a "package"). Only identity, version and
//! the config translation table are interpreted here; the execution descriptor
//! and any other fields are carried through untouched.

pub mod normalize;
pub mod version;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

pub use normalize::inject_default_controller_config;
pub use version::{compare_versions, is_version_higher, SpecVersion};

/// Raw specification document as received from the registry or a bundled file
pub type RawSpec = Value;

/// Mapping of abstract config keys to execution-specific fields
pub type ConfigTranslationMap = BTreeMap<String, ConfigTranslation>;

/// Controller specs keyed by `specId`
pub type NodeLibrary = HashMap<String, NodeSpecification>;

/// Package specs keyed by `specId`
pub type NodePackageLibrary = HashMap<String, NodePackageSpecification>;

/// Specification shape errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("Malformed specification: {0}")]
    Malformed(String),

    #[error("Specification is missing a specId")]
    MissingSpecId,

    #[error("Specification {spec_id} is missing required field: {field}")]
    MissingField { spec_id: String, field: &'static str },
}

/// One entry of a specification's config translation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigTranslation {
    /// Label shown next to the setting
    #[serde(default)]
    pub display_name: String,
    /// Settings group (e.g. "Other", "Networking")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Control descriptor, opaque here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_control: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Which step of the add-node flow shows this setting ("required", "advanced")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_node_flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_description: Option<String>,
    /// Execution-specific fields (cliConfigPrefix, valuesWrapper, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Container execution descriptor
///
/// Image, ports and volumes are opaque; only `defaultImageTag` is read, to seed
/// the service version setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image_tag: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Runnable service specification (controller)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpecification {
    /// Stable unique key (e.g. "geth")
    pub spec_id: String,
    pub display_name: String,
    pub version: SpecVersion,
    /// Absent in some documents; the builder defaults it to an empty table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_translation: Option<ConfigTranslationMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionDescriptor>,
    /// Remaining fields (category, requirements, documentation, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Installable bundle specification (package)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePackageSpecification {
    pub spec_id: String,
    pub display_name: String,
    pub version: SpecVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_translation: Option<ConfigTranslationMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Read the `specId` of a raw document, if it has a string one
pub fn raw_spec_id(raw: &RawSpec) -> Option<&str> {
    raw.get("specId").and_then(Value::as_str)
}

fn check_identity(spec_id: &str, display_name: &str) -> Result<(), SpecError> {
    if spec_id.trim().is_empty() {
        return Err(SpecError::MissingSpecId);
    }
    if display_name.trim().is_empty() {
        return Err(SpecError::MissingField {
            spec_id: spec_id.to_string(),
            field: "displayName",
        });
    }
    Ok(())
}

impl NodeSpecification {
    /// Parse a raw document into a controller specification
    ///
    /// Only the minimal identity checks are applied: non-empty `specId` and
    /// `displayName`, and a parseable `version`.
    pub fn from_raw(raw: &RawSpec) -> Result<Self, SpecError> {
        if raw_spec_id(raw).is_none() {
            return Err(SpecError::MissingSpecId);
        }
        let spec: NodeSpecification = serde_json::from_value(raw.clone())
            .map_err(|e| SpecError::Malformed(e.to_string()))?;
        check_identity(&spec.spec_id, &spec.display_name)?;
        Ok(spec)
    }

    /// Config translation table, empty if the document has none
    pub fn config_translation(&self) -> &ConfigTranslationMap {
        static EMPTY: ConfigTranslationMap = BTreeMap::new();
        self.config_translation.as_ref().unwrap_or(&EMPTY)
    }
}

impl NodePackageSpecification {
    /// Parse a raw document into a package specification
    pub fn from_raw(raw: &RawSpec) -> Result<Self, SpecError> {
        if raw_spec_id(raw).is_none() {
            return Err(SpecError::MissingSpecId);
        }
        let spec: NodePackageSpecification = serde_json::from_value(raw.clone())
            .map_err(|e| SpecError::Malformed(e.to_string()))?;
        check_identity(&spec.spec_id, &spec.display_name)?;
        Ok(spec)
    }
}
