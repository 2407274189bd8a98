//! Streaming validation of declared sets.
//!
//! Feed every `(site, primary)` pair of a candidate declaration through
//! [`FirstPartySetsValidator::update`] and then ask whether the result is
//! acceptable. A primary is acceptable when it:
//!
//! | Check | Failure name |
//! |-------|--------------|
//! | lists itself | orphan source |
//! | lists at least one other site | singleton |
//! | shares no site with another primary | overlap |
//!
//! Service sites count as "other sites" exactly like associated ones.

use std::collections::BTreeMap;

use crate::types::SchemefulSite;

#[derive(Debug, Clone, Copy)]
struct PrimarySiteState {
    has_self_entry: bool,
    has_nonself_entry: bool,
    is_disjoint: bool,
}

impl Default for PrimarySiteState {
    fn default() -> Self {
        Self {
            has_self_entry: false,
            has_nonself_entry: false,
            is_disjoint: true,
        }
    }
}

impl PrimarySiteState {
    fn is_valid(&self) -> bool {
        self.has_self_entry && self.has_nonself_entry && self.is_disjoint
    }
}

/// Accumulates membership pairs and reports singleton, orphan and overlap violations.
#[derive(Debug, Clone, Default)]
pub struct FirstPartySetsValidator {
    primary_states: BTreeMap<SchemefulSite, PrimarySiteState>,
    first_seen_primary: BTreeMap<SchemefulSite, SchemefulSite>,
}

impl FirstPartySetsValidator {
    /// Create an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `site` is declared as a member of `primary`'s set.
    pub fn update(&mut self, site: &SchemefulSite, primary: &SchemefulSite) {
        let state = self.primary_states.entry(primary.clone()).or_default();
        if site == primary {
            state.has_self_entry = true;
        } else {
            state.has_nonself_entry = true;
        }

        if let Some(previous) = self.first_seen_primary.get(site) {
            // Seen before: both the earlier and the current set overlap.
            let previous = previous.clone();
            self.mark_overlapping(primary);
            self.mark_overlapping(&previous);
        } else {
            self.first_seen_primary.insert(site.clone(), primary.clone());
        }
    }

    /// Whether every tracked primary passed all checks.
    pub fn is_valid(&self) -> bool {
        self.primary_states.values().all(PrimarySiteState::is_valid)
    }

    /// Whether `primary` is tracked and passed all checks.
    pub fn is_site_primary_valid(&self, primary: &SchemefulSite) -> bool {
        self.primary_states
            .get(primary)
            .is_some_and(PrimarySiteState::is_valid)
    }

    /// Primaries that failed at least one check, in site order.
    pub fn invalid_primaries(&self) -> Vec<&SchemefulSite> {
        self.primary_states
            .iter()
            .filter(|(_, state)| !state.is_valid())
            .map(|(primary, _)| primary)
            .collect()
    }

    fn mark_overlapping(&mut self, primary: &SchemefulSite) {
        if let Some(state) = self.primary_states.get_mut(primary) {
            state.is_disjoint = false;
        }
    }
}
