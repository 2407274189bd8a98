//! Policy-supplied changes to the canonical sets.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{FirstPartySetEntry, SchemefulSite};

/// One declared set: member site → entry.
pub type SingleSet = BTreeMap<SchemefulSite, FirstPartySetEntry>;

/// Error returned when a mutation's sets are not disjoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// A site appears in more than one set of the mutation.
    #[error("Site {site} appears in {count} sets of the mutation")]
    DuplicateSite {
        /// The repeated site.
        site: SchemefulSite,
        /// How many sets list it.
        count: usize,
    },
}

/// A validated bundle of replacement and addition sets.
///
/// Replacement sets redefine a set wholesale; addition sets merge new
/// members into whatever canonical set they overlap. No site appears in more
/// than one of the combined sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetsMutation {
    replacements: Vec<SingleSet>,
    additions: Vec<SingleSet>,
}

impl SetsMutation {
    /// Create a mutation, checking that every site occurs exactly once.
    pub fn new(replacements: Vec<SingleSet>, additions: Vec<SingleSet>) -> Result<Self, MutationError> {
        let mut site_counts: BTreeMap<&SchemefulSite, usize> = BTreeMap::new();
        for site in replacements.iter().chain(additions.iter()).flat_map(|set| set.keys()) {
            *site_counts.entry(site).or_insert(0) += 1;
        }

        if let Some((site, count)) = site_counts.into_iter().find(|(_, count)| *count > 1) {
            return Err(MutationError::DuplicateSite {
                site: site.clone(),
                count,
            });
        }

        Ok(Self {
            replacements,
            additions,
        })
    }

    /// A mutation holding one replacement set. A single set is trivially disjoint.
    pub(crate) fn single_replacement(set: SingleSet) -> Self {
        Self {
            replacements: vec![set],
            additions: Vec::new(),
        }
    }

    /// Replacement sets, in declaration order.
    pub fn replacements(&self) -> &[SingleSet] {
        &self.replacements
    }

    /// Addition sets, in declaration order.
    pub fn additions(&self) -> &[SingleSet] {
        &self.additions
    }

    /// Whether every set in the mutation is empty.
    pub fn is_empty(&self) -> bool {
        self.replacements.iter().all(BTreeMap::is_empty) && self.additions.iter().all(BTreeMap::is_empty)
    }
}
