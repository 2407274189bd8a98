//! Per-context overlay of set membership overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fingerprint::fingerprint_of;
use crate::types::{FirstPartySetEntryOverride, SchemefulSite};

/// A site → override overlay.
///
/// Produced by reconciling a mutation against the current sets, then held
/// unchanged for the lifetime of the context it was computed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstPartySetsContextConfig {
    customizations: BTreeMap<SchemefulSite, FirstPartySetEntryOverride>,
}

impl FirstPartySetsContextConfig {
    /// Create an overlay from its overrides.
    pub fn new(customizations: BTreeMap<SchemefulSite, FirstPartySetEntryOverride>) -> Self {
        Self { customizations }
    }

    /// Whether the overlay has no overrides.
    pub fn is_empty(&self) -> bool {
        self.customizations.is_empty()
    }

    /// Number of overridden sites.
    pub fn len(&self) -> usize {
        self.customizations.len()
    }

    /// The override for `site`, if any. `site` must already be normalized.
    pub fn find_override(&self, site: &SchemefulSite) -> Option<&FirstPartySetEntryOverride> {
        self.customizations.get(site)
    }

    /// Whether the overlay says anything about `site`.
    pub fn contains(&self, site: &SchemefulSite) -> bool {
        self.customizations.contains_key(site)
    }

    /// All overrides, in site order.
    pub fn customizations(&self) -> &BTreeMap<SchemefulSite, FirstPartySetEntryOverride> {
        &self.customizations
    }

    /// Visit every override until `f` returns `false`.
    ///
    /// Returns `false` if iteration stopped early.
    pub fn for_each_customization_entry<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&SchemefulSite, &FirstPartySetEntryOverride) -> bool,
    {
        self.customizations.iter().all(|(site, entry_override)| f(site, entry_override))
    }

    /// Deterministic fingerprint of the overlay contents.
    pub fn fingerprint(&self) -> String {
        fingerprint_of(&self.customizations)
    }
}

impl FromIterator<(SchemefulSite, FirstPartySetEntryOverride)> for FirstPartySetsContextConfig {
    fn from_iter<I: IntoIterator<Item = (SchemefulSite, FirstPartySetEntryOverride)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
