//! Runtime settings: feature switch and optional local test set.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `FIRST_PARTY_SETS_ENABLED` | `true`/`false`/`1`/`0`/`on`/`off` | `true` |
//! | `FIRST_PARTY_SETS_LOCAL_SET` | JSON set declaration | unset |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sets::{GlobalFirstPartySets, LocalSetDeclaration, LocalSetError, RegistryError};
use crate::types::{FirstPartySetEntry, SchemefulSite, Version};

/// Environment variable toggling set resolution.
pub const ENABLED_ENV: &str = "FIRST_PARTY_SETS_ENABLED";

/// Environment variable holding a local set declaration.
pub const LOCAL_SET_ENV: &str = "FIRST_PARTY_SETS_LOCAL_SET";

/// Error type for settings loading and application.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// A variable holds a value that cannot be interpreted.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
    /// The configured local set was rejected.
    #[error("Local set rejected: {0}")]
    LocalSet(#[from] LocalSetError),
    /// The registry data was rejected.
    #[error("Registry rejected: {0}")]
    Registry(#[from] RegistryError),
}

/// Settings controlling how the global sets are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPartySetsSettings {
    /// When false, every site resolves to no set.
    pub enabled: bool,
    /// JSON declaration of a local test set.
    pub local_set: Option<String>,
}

impl Default for FirstPartySetsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            local_set: None,
        }
    }
}

impl FirstPartySetsSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from an arbitrary key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENABLED_ENV) {
            settings.enabled = parse_bool(&raw).ok_or_else(|| SettingsError::InvalidValue {
                key: ENABLED_ENV.to_string(),
                value: raw.clone(),
            })?;
        }
        settings.local_set = lookup(LOCAL_SET_ENV).filter(|raw| !raw.trim().is_empty());

        Ok(settings)
    }

    /// Parse the configured local set, empty when none is configured.
    pub fn local_set_declaration(&self) -> Result<LocalSetDeclaration, SettingsError> {
        match &self.local_set {
            None => Ok(LocalSetDeclaration::default()),
            Some(raw) => LocalSetDeclaration::from_json(raw).map_err(|e| {
                tracing::warn!(error = %e, "Ignoring invalid local first-party set");
                SettingsError::from(e)
            }),
        }
    }

    /// Build the global sets from registry data under these settings.
    ///
    /// Disabled settings yield empty sets. Otherwise the local set, if
    /// configured, is applied on top of the registry.
    pub fn build(
        &self,
        version: Version,
        entries: BTreeMap<SchemefulSite, FirstPartySetEntry>,
        aliases: BTreeMap<SchemefulSite, SchemefulSite>,
    ) -> Result<GlobalFirstPartySets, SettingsError> {
        if !self.enabled {
            tracing::info!("First-party sets disabled; all sites resolve to no set");
            return Ok(GlobalFirstPartySets::default());
        }

        let local_set = self.local_set_declaration()?;
        let mut sets = GlobalFirstPartySets::new(version, entries, aliases)?;
        sets.apply_manually_specified_set(&local_set);
        Ok(sets)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
