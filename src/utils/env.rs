//! Environment variable helpers

/// Read an environment variable, `None` if unset or not valid unicode
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
