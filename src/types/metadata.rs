//! Per-request membership summary handed to cookie access logic.

use serde::{Deserialize, Serialize};

use super::entry::FirstPartySetEntry;

/// Resolved set membership for a frame and its top-level frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstPartySetMetadata {
    /// Whether the frame, the top frame and every party-context site share one set.
    pub same_party: bool,
    /// Entry of the requesting frame's site, if it belongs to a set.
    pub frame_entry: Option<FirstPartySetEntry>,
    /// Entry of the top frame's site, if it belongs to a set.
    pub top_frame_entry: Option<FirstPartySetEntry>,
}

impl FirstPartySetMetadata {
    /// Create metadata from its parts.
    pub fn new(
        same_party: bool,
        frame_entry: Option<FirstPartySetEntry>,
        top_frame_entry: Option<FirstPartySetEntry>,
    ) -> Self {
        Self {
            same_party,
            frame_entry,
            top_frame_entry,
        }
    }

    /// Whether the frame and top frame both belong to the same set.
    ///
    /// Unlike `same_party`, this ignores the intermediate party context.
    pub fn are_sites_in_same_first_party_set(&self) -> bool {
        match (&self.frame_entry, &self.top_frame_entry) {
            (Some(frame), Some(top)) => frame.primary() == top.primary(),
            _ => false,
        }
    }
}
