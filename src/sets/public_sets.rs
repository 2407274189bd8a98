//! Canonical sets derived from the registry.
//!
//! `PublicSets` is the immutable base layer: a map from every member site to
//! its entry, plus a ccTLD alias table mapping alternate-TLD variants onto
//! canonical members. It can absorb one manually specified set, which
//! removes every canonical set the manual set touches.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::context_config::FirstPartySetsContextConfig;
use crate::types::{FirstPartySetEntry, SchemefulSite};

/// Error returned when registry data violates the public set invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// An alias points at a site with no entry.
    #[error("Alias {alias} refers to {target}, which has no entry")]
    AliasTargetMissing {
        /// The alias site.
        alias: SchemefulSite,
        /// Its missing canonical site.
        target: SchemefulSite,
    },
    /// A site is both an alias and an entry.
    #[error("Site {0} is both an alias and an entry")]
    AliasShadowsEntry(SchemefulSite),
}

/// Canonical registry snapshot: entries plus alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicSets {
    entries: BTreeMap<SchemefulSite, FirstPartySetEntry>,
    aliases: BTreeMap<SchemefulSite, SchemefulSite>,
}

impl PublicSets {
    /// Create public sets, checking the alias invariants.
    pub fn new(
        entries: BTreeMap<SchemefulSite, FirstPartySetEntry>,
        aliases: BTreeMap<SchemefulSite, SchemefulSite>,
    ) -> Result<Self, RegistryError> {
        for (alias, target) in &aliases {
            if !entries.contains_key(target) {
                return Err(RegistryError::AliasTargetMissing {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
            if entries.contains_key(alias) {
                return Err(RegistryError::AliasShadowsEntry(alias.clone()));
            }
        }
        Ok(Self { entries, aliases })
    }

    /// Member site → entry.
    pub fn entries(&self) -> &BTreeMap<SchemefulSite, FirstPartySetEntry> {
        &self.entries
    }

    /// Alias → canonical site.
    pub fn aliases(&self) -> &BTreeMap<SchemefulSite, SchemefulSite> {
        &self.aliases
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries, aliases excluded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the entry for `site`.
    ///
    /// An override in `config` takes precedence (a deletion yields `None`);
    /// otherwise aliases are resolved and the canonical entry returned.
    pub fn find_entry(
        &self,
        site: &SchemefulSite,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> Option<FirstPartySetEntry> {
        let normalized = site.normalized();
        if let Some(entry_override) = config.and_then(|c| c.find_override(&normalized)) {
            return entry_override.entry().cloned();
        }
        self.find_canonical_entry(&normalized).cloned()
    }

    /// Batched [`find_entry`](Self::find_entry); sites without an entry are omitted.
    pub fn find_entries<'a, I>(
        &self,
        sites: I,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> BTreeMap<SchemefulSite, FirstPartySetEntry>
    where
        I: IntoIterator<Item = &'a SchemefulSite>,
    {
        sites
            .into_iter()
            .filter_map(|site| self.find_entry(site, config).map(|entry| (site.clone(), entry)))
            .collect()
    }

    /// Alias-resolved lookup of an already-normalized site, ignoring overlays.
    pub(crate) fn find_canonical_entry(&self, normalized: &SchemefulSite) -> Option<&FirstPartySetEntry> {
        let canonical = self.aliases.get(normalized).unwrap_or(normalized);
        self.entries.get(canonical)
    }

    /// Visit every entry, then every alias with its canonical site's entry.
    ///
    /// Stops when `f` returns `false`; returns whether iteration completed.
    pub fn for_each_public_set_entry<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&SchemefulSite, &FirstPartySetEntry) -> bool,
    {
        for (site, entry) in &self.entries {
            if !f(site, entry) {
                return false;
            }
        }
        for (alias, canonical) in &self.aliases {
            if let Some(entry) = self.entries.get(canonical) {
                if !f(alias, entry) {
                    return false;
                }
            }
        }
        true
    }

    /// Replace the canonical sets that intersect a manually specified set.
    ///
    /// Every canonical site that is `manual_primary`, belongs to its set, is
    /// listed in `manual_entries`, or belongs to a set whose primary is listed
    /// there is removed. Primaries left without members are removed as well.
    /// The manual entries are then inserted, aliases of removed sites are
    /// dropped, and `manual_aliases` are added.
    pub fn apply_manually_specified_set(
        &mut self,
        manual_primary: &SchemefulSite,
        manual_entries: &BTreeMap<SchemefulSite, FirstPartySetEntry>,
        manual_aliases: &BTreeMap<SchemefulSite, SchemefulSite>,
    ) {
        let mut removed: BTreeSet<SchemefulSite> = BTreeSet::new();

        self.entries.retain(|site, entry| {
            let intersects = site == manual_primary
                || entry.primary() == manual_primary
                || manual_entries.contains_key(site)
                || manual_entries.contains_key(entry.primary());
            if intersects {
                removed.insert(site.clone());
            }
            !intersects
        });

        for singleton in self.primaries_without_members() {
            tracing::trace!(primary = %singleton, "Removing singleton public set");
            self.entries.remove(&singleton);
            removed.insert(singleton);
        }

        self.entries
            .extend(manual_entries.iter().map(|(site, entry)| (site.clone(), entry.clone())));

        self.aliases
            .retain(|alias, target| !removed.contains(target) && !manual_entries.contains_key(alias));
        self.aliases
            .extend(manual_aliases.iter().map(|(alias, target)| (alias.clone(), target.clone())));

        tracing::info!(
            primary = %manual_primary,
            manual_entries = manual_entries.len(),
            removed_entries = removed.len(),
            "Applied manually specified set to public sets"
        );
    }

    /// Primaries with a self-entry but no other member.
    fn primaries_without_members(&self) -> Vec<SchemefulSite> {
        let with_members: BTreeSet<&SchemefulSite> = self
            .entries
            .iter()
            .filter(|(site, entry)| *site != entry.primary())
            .map(|(_, entry)| entry.primary())
            .collect();

        self.entries
            .iter()
            .filter(|(site, entry)| *site == entry.primary() && !with_members.contains(site))
            .map(|(site, _)| site.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FirstPartySetEntryOverride, SiteIndex, SiteType};

    fn site(s: &str) -> SchemefulSite {
        SchemefulSite::parse(s).unwrap()
    }

    fn primary(p: &str) -> FirstPartySetEntry {
        FirstPartySetEntry::primary_of(site(p))
    }

    fn associated(p: &str, index: u32) -> FirstPartySetEntry {
        FirstPartySetEntry::new(site(p), SiteType::Associated, Some(SiteIndex::new(index)))
    }

    /// a.test: {a, b, c}, alias a.example → a.test; x.test: {x, y}.
    fn sample() -> PublicSets {
        PublicSets::new(
            BTreeMap::from([
                (site("https://a.test"), primary("https://a.test")),
                (site("https://b.test"), associated("https://a.test", 0)),
                (site("https://c.test"), associated("https://a.test", 1)),
                (site("https://x.test"), primary("https://x.test")),
                (site("https://y.test"), associated("https://x.test", 0)),
            ]),
            BTreeMap::from([(site("https://a.example"), site("https://a.test"))]),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_aliases() {
        let entries = BTreeMap::from([(site("https://a.test"), primary("https://a.test"))]);
        let missing = PublicSets::new(
            entries.clone(),
            BTreeMap::from([(site("https://a.example"), site("https://z.test"))]),
        );
        assert!(matches!(missing, Err(RegistryError::AliasTargetMissing { .. })));

        let shadow = PublicSets::new(
            entries,
            BTreeMap::from([(site("https://a.test"), site("https://a.test"))]),
        );
        assert_eq!(shadow, Err(RegistryError::AliasShadowsEntry(site("https://a.test"))));
    }

    #[test]
    fn test_find_entry_resolves_alias_and_scheme() {
        let sets = sample();
        assert_eq!(sets.find_entry(&site("https://a.example"), None), Some(primary("https://a.test")));
        assert_eq!(sets.find_entry(&site("wss://b.test"), None), Some(associated("https://a.test", 0)));
        assert_eq!(sets.find_entry(&site("https://nope.test"), None), None);
        // http and https are distinct sites.
        assert_eq!(sets.find_entry(&site("http://a.test"), None), None);
    }

    #[test]
    fn test_find_entry_config_precedence() {
        let sets = sample();
        let moved = FirstPartySetEntry::new(site("https://x.test"), SiteType::Associated, None);
        let config = FirstPartySetsContextConfig::from_iter([
            (site("https://b.test"), FirstPartySetEntryOverride::Deletion),
            (site("https://c.test"), moved.clone().into()),
        ]);

        assert_eq!(sets.find_entry(&site("https://b.test"), Some(&config)), None);
        assert_eq!(sets.find_entry(&site("https://c.test"), Some(&config)), Some(moved));
        assert_eq!(sets.find_entry(&site("https://y.test"), Some(&config)), Some(associated("https://x.test", 0)));
    }

    #[test]
    fn test_find_entries_omits_misses() {
        let sets = sample();
        let queried = [site("https://a.test"), site("https://nope.test"), site("https://y.test")];
        let found = sets.find_entries(queried.iter(), None);
        assert_eq!(found.len(), 2);
        assert!(!found.contains_key(&site("https://nope.test")));
    }

    #[test]
    fn test_for_each_public_set_entry_includes_aliases() {
        let sets = sample();
        let mut visited = Vec::new();
        assert!(sets.for_each_public_set_entry(|s, _| {
            visited.push(s.clone());
            true
        }));
        assert_eq!(visited.len(), 6);
        assert_eq!(visited.last(), Some(&site("https://a.example")));
    }

    #[test]
    fn test_apply_manual_set_replaces_intersecting_sets() {
        let mut sets = sample();
        // Manual set takes b.test away from a.test and y.test away from x.test.
        let manual_primary = site("https://m.test");
        let manual = BTreeMap::from([
            (manual_primary.clone(), primary("https://m.test")),
            (site("https://b.test"), associated("https://m.test", 0)),
            (site("https://y.test"), associated("https://m.test", 1)),
        ]);
        let manual_aliases = BTreeMap::from([(site("https://m.example"), manual_primary.clone())]);

        sets.apply_manually_specified_set(&manual_primary, &manual, &manual_aliases);

        // a.test keeps c.test, x.test became a singleton and is gone.
        assert_eq!(sets.find_entry(&site("https://a.test"), None), Some(primary("https://a.test")));
        assert_eq!(sets.find_entry(&site("https://c.test"), None), Some(associated("https://a.test", 1)));
        assert_eq!(sets.find_entry(&site("https://x.test"), None), None);
        assert_eq!(sets.find_entry(&site("https://b.test"), None), Some(associated("https://m.test", 0)));
        assert_eq!(sets.find_entry(&site("https://m.example"), None), Some(primary("https://m.test")));
        assert_eq!(sets.find_entry(&site("https://a.example"), None), Some(primary("https://a.test")));
    }

    #[test]
    fn test_apply_manual_set_removes_whole_set_of_listed_primary() {
        let mut sets = sample();
        let manual_primary = site("https://a.test");
        let manual = BTreeMap::from([
            (manual_primary.clone(), primary("https://a.test")),
            (site("https://n.test"), associated("https://a.test", 0)),
        ]);

        sets.apply_manually_specified_set(&manual_primary, &manual, &BTreeMap::new());

        assert_eq!(sets.find_entry(&site("https://b.test"), None), None);
        assert_eq!(sets.find_entry(&site("https://c.test"), None), None);
        assert_eq!(sets.find_entry(&site("https://n.test"), None), Some(associated("https://a.test", 0)));
        // The alias pointed at a removed canonical site.
        assert_eq!(sets.find_entry(&site("https://a.example"), None), None);
        assert!(sets.aliases().is_empty());
        // Untouched set survives.
        assert_eq!(sets.find_entry(&site("https://y.test"), None), Some(associated("https://x.test", 0)));
    }
}
