//! Logging initialization
//!
//! `RUST_LOG` takes precedence over a configured filter; without either the
//! filter defaults to `info`. Initialization is idempotent: a second call
//! leaves the first subscriber in place.

use crate::config::LoggingConfig;
use crate::utils::env_opt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

fn build_filter(filter: Option<&str>) -> EnvFilter {
    if env_opt("RUST_LOG").is_some() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn use_ansi() -> bool {
    env_opt("NO_COLOR").is_none()
}

/// Initialize human-readable logging
pub fn init_logging(filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(filter))
        .with_ansi(use_ansi())
        .with_target(true)
        .try_init();
}

/// Initialize logging for a named component
///
/// Every event carries the component name as its target prefix, and the
/// default filter is scoped to it.
pub fn init_module_logging(component: &str, filter: Option<&str>) {
    let scoped = format!("{component}={}", filter.unwrap_or(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(Some(&scoped)))
        .with_ansi(use_ansi())
        .with_target(true)
        .try_init();
}

/// Initialize JSON logging (for log aggregation systems)
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(build_filter(filter))
        .try_init();
}

/// Initialize logging from configuration
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    let filter = config.and_then(|c| c.filter.as_deref());

    #[cfg(feature = "json-logging")]
    {
        if config.is_some_and(|c| c.json_format) {
            init_json_logging(filter);
            return;
        }
    }

    init_logging(filter);
}
