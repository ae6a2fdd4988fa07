//! Default controller configuration
//!
//! Every controller gets the same universal settings regardless of where its
//! specification came from. Existing entries are never overwritten, so
//! normalizing an already normalized spec returns it unchanged.

use crate::spec::{ConfigTranslation, NodeSpecification};
use serde_json::{json, Map};

/// Free-form extra CLI arguments
pub const CLI_INPUT_KEY: &str = "cliInput";

/// Container image tag to run
pub const SERVICE_VERSION_KEY: &str = "serviceVersion";

/// Image tag used when the execution descriptor names none
pub const DEFAULT_IMAGE_TAG: &str = "latest";

fn cli_input_entry() -> ConfigTranslation {
    ConfigTranslation {
        display_name: "Additional CLI input".to_string(),
        category: Some("Other".to_string()),
        ui_control: Some(json!({ "type": "text" })),
        default_value: None,
        add_node_flow: Some("advanced".to_string()),
        info_description: Some(
            "Extra command line arguments appended when the node is started".to_string(),
        ),
        extra: Map::new(),
    }
}

fn service_version_entry(spec: &NodeSpecification) -> ConfigTranslation {
    let tag = spec
        .execution
        .as_ref()
        .and_then(|execution| execution.default_image_tag.clone())
        .unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string());

    ConfigTranslation {
        display_name: format!("{} version", spec.display_name),
        category: Some("Other".to_string()),
        ui_control: Some(json!({ "type": "text" })),
        default_value: Some(json!(tag)),
        add_node_flow: Some("advanced".to_string()),
        info_description: Some("Container image tag of the service".to_string()),
        extra: Map::new(),
    }
}

/// Return a copy of `spec` with the universal controller settings injected
///
/// A missing config translation table becomes an empty one before injection.
pub fn inject_default_controller_config(spec: &NodeSpecification) -> NodeSpecification {
    let mut normalized = spec.clone();
    let mut table = normalized.config_translation.take().unwrap_or_default();

    table
        .entry(CLI_INPUT_KEY.to_string())
        .or_insert_with(cli_input_entry);
    table
        .entry(SERVICE_VERSION_KEY.to_string())
        .or_insert_with(|| service_version_entry(spec));

    normalized.config_translation = Some(table);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(raw: serde_json::Value) -> NodeSpecification {
        NodeSpecification::from_raw(&raw).unwrap()
    }

    #[test]
    fn test_injects_defaults_into_missing_table() {
        let original = spec(json!({
            "specId": "reth",
            "displayName": "Reth",
            "version": "1.0.0",
            "execution": { "imageName": "ghcr.io/paradigmxyz/reth", "defaultImageTag": "v1.0.0" }
        }));

        let normalized = inject_default_controller_config(&original);
        let table = normalized.config_translation();

        assert_eq!(table.len(), 2);
        assert_eq!(table[CLI_INPUT_KEY].display_name, "Additional CLI input");
        assert_eq!(table[SERVICE_VERSION_KEY].display_name, "Reth version");
        assert_eq!(table[SERVICE_VERSION_KEY].default_value, Some(json!("v1.0.0")));
        // input untouched
        assert!(original.config_translation.is_none());
    }

    #[test]
    fn test_service_version_defaults_to_latest() {
        let original = spec(json!({ "specId": "magi", "displayName": "Magi", "version": "1" }));
        let normalized = inject_default_controller_config(&original);
        assert_eq!(
            normalized.config_translation()[SERVICE_VERSION_KEY].default_value,
            Some(json!(DEFAULT_IMAGE_TAG))
        );
    }

    #[test]
    fn test_existing_entries_are_kept() {
        let original = spec(json!({
            "specId": "geth",
            "displayName": "Geth",
            "version": "1.0.0",
            "configTranslation": {
                "cliInput": { "displayName": "Custom flags", "cliConfigPrefix": "" },
                "httpPort": { "displayName": "HTTP port", "cliConfigPrefix": "--http.port " }
            }
        }));

        let normalized = inject_default_controller_config(&original);
        let table = normalized.config_translation();

        assert_eq!(table.len(), 3);
        assert_eq!(table[CLI_INPUT_KEY].display_name, "Custom flags");
        assert!(table[CLI_INPUT_KEY].extra.contains_key("cliConfigPrefix"));
        assert_eq!(table["httpPort"].display_name, "HTTP port");
    }

    #[test]
    fn test_idempotent() {
        let original = spec(json!({
            "specId": "lodestar",
            "displayName": "Lodestar",
            "version": "1.0.0",
            "configTranslation": {}
        }));

        let once = inject_default_controller_config(&original);
        let twice = inject_default_controller_config(&once);
        assert_eq!(once, twice);
        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }
}
