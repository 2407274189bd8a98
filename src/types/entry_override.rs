//! Overlay decisions: replace a site's entry or delete it.

use serde::{Deserialize, Serialize};

use super::entry::FirstPartySetEntry;

/// One overlay decision for a site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirstPartySetEntryOverride {
    /// The site is removed from whatever set it belonged to.
    Deletion,
    /// The site belongs to the given set, regardless of lower layers.
    Entry(FirstPartySetEntry),
}

impl FirstPartySetEntryOverride {
    /// Whether this override removes the site.
    pub fn is_deletion(&self) -> bool {
        matches!(self, Self::Deletion)
    }

    /// The replacement entry, or `None` for a deletion.
    pub fn entry(&self) -> Option<&FirstPartySetEntry> {
        match self {
            Self::Deletion => None,
            Self::Entry(entry) => Some(entry),
        }
    }
}

impl From<FirstPartySetEntry> for FirstPartySetEntryOverride {
    fn from(entry: FirstPartySetEntry) -> Self {
        Self::Entry(entry)
    }
}
