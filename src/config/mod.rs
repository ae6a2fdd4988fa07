//! Configuration management for the node specification library
//!
//! Handles configuration loading, environment overrides and validation.
//! Environment overrides are read once, when the configuration is built, and
//! the resulting values are handed to the registry client explicitly.

use crate::utils::env_opt;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overrides the registry base URL
pub const ENV_REGISTRY_URL: &str = "CONTROLLER_API_URL";

/// Forces plaintext HTTP to the registry when set to any non-empty value
pub const ENV_REGISTRY_URL_IS_HTTP: &str = "CONTROLLER_API_URL_IS_HTTP";

/// Public specification registry
pub const DEFAULT_REGISTRY_URL: &str = "https://api.nicenode.xyz/api";

/// Registry connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL; collection endpoints are appended to it
    #[serde(default = "default_registry_url")]
    pub base_url: String,

    /// Talk plaintext HTTP even if the URL says https
    #[serde(default = "default_false")]
    pub force_http: bool,

    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_false() -> bool {
    false
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            force_http: false,
            request_timeout_seconds: 30,
        }
    }
}

impl RegistryConfig {
    /// Create a config for the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Default config with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Apply `CONTROLLER_API_URL` and `CONTROLLER_API_URL_IS_HTTP`
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = env_opt(ENV_REGISTRY_URL).filter(|u| !u.trim().is_empty()) {
            tracing::info!("Registry URL overridden from environment: {}", url);
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if env_opt(ENV_REGISTRY_URL_IS_HTTP).is_some_and(|v| !v.is_empty()) {
            self.force_http = true;
        }
    }

    /// Whether requests go over plaintext HTTP
    ///
    /// True when forced, when the URL is `http://`, or when the registry runs
    /// on the local host.
    pub fn plaintext(&self) -> bool {
        self.force_http
            || self.base_url.starts_with("http://")
            || self.base_url.contains("localhost")
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("registry.base_url must not be empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "registry.base_url must start with http:// or https://, got {}",
                url
            );
        }
        if self.request_timeout_seconds == 0 {
            anyhow::bail!("registry.request_timeout_seconds must be greater than zero");
        }
        Ok(())
    }
}

/// Library snapshot persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `node_library.json`; no persistence when unset
    #[serde(default)]
    pub persist_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "node_spec_library=debug")
    /// If not set, uses RUST_LOG environment variable or defaults to "info"
    #[serde(default)]
    pub filter: Option<String>,

    /// Enable JSON logging format (for log aggregation systems)
    #[serde(default)]
    pub json_format: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl LibraryConfig {
    /// Load configuration from file (supports JSON and TOML)
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {:?}: {}", path, e))?;

        let config: LibraryConfig = if path.extension().and_then(|s| s.to_str()) == Some("toml")
        {
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse JSON config: {}", e))?
        };
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_toml_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize TOML config: {}", e))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides to the registry section
    pub fn apply_env_overrides(&mut self) {
        self.registry.apply_env_overrides();
    }

    /// Load from an optional file, then apply environment overrides and validate
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.registry.validate()
    }
}
