//! Registry version numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dotted numeric version of the canonical registry (e.g. `2024.1.3`).
///
/// An invalid version is representable; it marks a registry that was never
/// successfully loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    components: Option<Vec<u32>>,
}

impl Version {
    /// Parse a dotted version string. Returns an invalid version on malformed input.
    pub fn parse(s: &str) -> Self {
        let components: Option<Vec<u32>> = s
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse().ok()
                }
            })
            .collect();
        Self { components }
    }

    /// Build a version from its components.
    pub fn from_components(components: impl IntoIterator<Item = u32>) -> Self {
        let components: Vec<u32> = components.into_iter().collect();
        if components.is_empty() {
            return Self::invalid();
        }
        Self {
            components: Some(components),
        }
    }

    /// The invalid version.
    pub fn invalid() -> Self {
        Self { components: None }
    }

    /// Whether the version was parsed successfully.
    pub fn is_valid(&self) -> bool {
        self.components.is_some()
    }

    /// Numeric components, empty when invalid.
    pub fn components(&self) -> &[u32] {
        self.components.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.components {
            None => write!(f, "invalid"),
            Some(components) => {
                let parts: Vec<String> = components.iter().map(|c| c.to_string()).collect();
                write!(f, "{}", parts.join("."))
            }
        }
    }
}
