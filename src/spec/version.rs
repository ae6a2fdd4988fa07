//! Specification version ordering
//!
//! Versions are dot-separated sequences of non-negative integers compared
//! component-wise, left to right, with missing trailing components treated as
//! zero ("13" == "13.0.0", "2.1" > "2.0.9"). A component that is not a
//! non-negative integer counts as zero. Components have no width limit.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Digits of a component without leading zeros; zero is the empty string
fn normalize_component(part: &str) -> &str {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return "";
    }
    part.trim_start_matches('0')
}

fn parse_components(version: &str) -> Vec<&str> {
    version.split('.').map(normalize_component).collect()
}

fn compare_components(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two dot-separated numeric versions
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_components(a);
    let b = parse_components(b);

    for i in 0..a.len().max(b.len()) {
        let left = a.get(i).copied().unwrap_or("");
        let right = b.get(i).copied().unwrap_or("");
        match compare_components(left, right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// True when `current` is strictly greater than `target`
///
/// Used by requirement checks such as a minimum OS release.
pub fn is_version_higher(current: &str, target: &str) -> bool {
    compare_versions(current, target) == Ordering::Greater
}

/// Version of a node specification
///
/// Keeps the text as published; equality and ordering follow
/// [`compare_versions`], so `"1.0"` and `"1.0.0"` are equal.
#[derive(Debug, Clone)]
pub struct SpecVersion(String);

impl SpecVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for SpecVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SpecVersion {}

impl PartialOrd for SpecVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpecVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.0, &other.0)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpecVersion {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for SpecVersion {
    fn from(version: String) -> Self {
        Self(version)
    }
}

impl Serialize for SpecVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct SpecVersionVisitor;

impl<'de> Visitor<'de> for SpecVersionVisitor {
    type Value = SpecVersion;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a version string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(SpecVersion::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(SpecVersion(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(SpecVersion(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Err(E::custom(format!("negative version: {v}")));
        }
        Ok(SpecVersion(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::custom(format!("invalid version: {v}")));
        }
        Ok(SpecVersion(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for SpecVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpecVersionVisitor)
    }
}
