//! A single set declared locally for testing.
//!
//! ## Declaration Format
//!
//! ```json
//! {
//!   "primary": "https://a.test",
//!   "associatedSites": ["https://b.test"],
//!   "serviceSites": ["https://c.test"],
//!   "ccTLDs": { "https://a.test": ["https://a.example"] }
//! }
//! ```
//!
//! Associated sites are indexed by position; primaries and service sites
//! carry no index. `ccTLDs` maps a member to alternate-TLD aliases of it.
//!
//! A local declaration always *replaces*: applying it removes every listed
//! site from whatever canonical set it was in.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::mutation::{SetsMutation, SingleSet};
use super::validator::FirstPartySetsValidator;
use crate::types::{FirstPartySetEntry, SchemefulSite, SiteError, SiteIndex, SiteType};

/// Error returned when a local declaration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum LocalSetError {
    /// An alias points at a site the declaration does not list.
    #[error("Alias {alias} refers to {target}, which is not in the set")]
    AliasTargetMissing {
        /// The alias site.
        alias: SchemefulSite,
        /// Its missing canonical site.
        target: SchemefulSite,
    },
    /// An alias is also listed as a regular member.
    #[error("Alias {0} is also listed as a set member")]
    AliasShadowsEntry(SchemefulSite),
    /// The declaration contains only its primary.
    #[error("Set for {0} has no members besides its primary")]
    Singleton(SchemefulSite),
    /// Entries disagree on the primary.
    #[error("Set mixes primaries {expected} and {found}")]
    MixedPrimaries {
        /// Primary of the first entry.
        expected: SchemefulSite,
        /// The conflicting primary.
        found: SchemefulSite,
    },
    /// The validator rejected the declared set.
    #[error("Declared set for {0} is invalid: it must list its primary, at least one member, and no site twice")]
    InvalidDeclaration(SchemefulSite),
    /// A site string could not be parsed.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// The declaration is not valid JSON of the expected shape.
    #[error("Malformed set declaration: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSetDeclaration {
    primary: String,
    #[serde(default)]
    associated_sites: Vec<String>,
    #[serde(default)]
    service_sites: Vec<String>,
    #[serde(default, rename = "ccTLDs")]
    cc_tlds: BTreeMap<String, Vec<String>>,
}

/// One locally declared set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSetDeclaration {
    set_entries: SingleSet,
    aliases: BTreeMap<SchemefulSite, SchemefulSite>,
}

impl LocalSetDeclaration {
    /// Create a declaration from its entries and alias → canonical map.
    ///
    /// Rejects aliases to unlisted sites, aliases that are also members,
    /// single-entry sets and entries with differing primaries. An empty
    /// declaration is accepted and applies nothing.
    pub fn create(
        set_entries: SingleSet,
        aliases: BTreeMap<SchemefulSite, SchemefulSite>,
    ) -> Result<Self, LocalSetError> {
        for (alias, target) in &aliases {
            if !set_entries.contains_key(target) {
                return Err(LocalSetError::AliasTargetMissing {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
            if set_entries.contains_key(alias) {
                return Err(LocalSetError::AliasShadowsEntry(alias.clone()));
            }
        }

        if let Some(first) = set_entries.values().next() {
            if set_entries.len() == 1 {
                return Err(LocalSetError::Singleton(first.primary().clone()));
            }
            if let Some(other) = set_entries.values().find(|e| e.primary() != first.primary()) {
                return Err(LocalSetError::MixedPrimaries {
                    expected: first.primary().clone(),
                    found: other.primary().clone(),
                });
            }
        }

        Ok(Self { set_entries, aliases })
    }

    /// Parse and validate a JSON declaration. Blank input yields an empty declaration.
    pub fn from_json(json: &str) -> Result<Self, LocalSetError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSetDeclaration = serde_json::from_str(json)?;

        let primary = SchemefulSite::parse(&raw.primary)?;
        let mut declared: Vec<(SchemefulSite, FirstPartySetEntry)> =
            vec![(primary.clone(), FirstPartySetEntry::primary_of(primary.clone()))];
        for (index, member) in raw.associated_sites.iter().enumerate() {
            let index = SiteIndex::new(u32::try_from(index).unwrap_or(u32::MAX));
            declared.push((
                SchemefulSite::parse(member)?,
                FirstPartySetEntry::new(primary.clone(), SiteType::Associated, Some(index)),
            ));
        }
        for member in &raw.service_sites {
            declared.push((
                SchemefulSite::parse(member)?,
                FirstPartySetEntry::new(primary.clone(), SiteType::Service, None),
            ));
        }

        let mut validator = FirstPartySetsValidator::new();
        for (site, entry) in &declared {
            validator.update(site, entry.primary());
        }
        if !validator.is_valid() {
            return Err(LocalSetError::InvalidDeclaration(primary));
        }

        let mut aliases = BTreeMap::new();
        for (canonical, variants) in &raw.cc_tlds {
            let canonical = SchemefulSite::parse(canonical)?;
            for variant in variants {
                aliases.insert(SchemefulSite::parse(variant)?, canonical.clone());
            }
        }

        Self::create(declared.into_iter().collect(), aliases)
    }

    /// Whether the declaration lists no sites.
    pub fn is_empty(&self) -> bool {
        self.set_entries.is_empty()
    }

    /// The set's primary, if the declaration is non-empty.
    pub fn primary(&self) -> Option<&SchemefulSite> {
        self.set_entries.values().next().map(FirstPartySetEntry::primary)
    }

    /// Member entries, excluding aliases.
    pub fn entries(&self) -> &SingleSet {
        &self.set_entries
    }

    /// Alias → canonical site.
    pub fn aliases(&self) -> &BTreeMap<SchemefulSite, SchemefulSite> {
        &self.aliases
    }

    /// Members plus aliases, each alias carrying its canonical site's entry.
    pub fn expanded_entries(&self) -> SingleSet {
        let mut expanded = self.set_entries.clone();
        for (alias, canonical) in &self.aliases {
            expanded
                .entry(alias.clone())
                .or_insert_with(|| self.set_entries[canonical].clone());
        }
        expanded
    }

    /// The declaration as a mutation with a single replacement set.
    pub fn compute_mutation(&self) -> SetsMutation {
        if self.is_empty() {
            return SetsMutation::default();
        }
        SetsMutation::single_replacement(self.expanded_entries())
    }
}
