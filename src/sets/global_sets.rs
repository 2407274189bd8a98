//! Resolved set membership across all layers.
//!
//! ## Layers
//!
//! Lookups consult three layers, highest precedence first:
//!
//! | Layer | Source | Lifetime |
//! |-------|--------|----------|
//! | Context config | enterprise policy, via [`GlobalFirstPartySets::compute_config`] | per context |
//! | Manual config | local test declaration | process, applied once |
//! | Public sets | canonical registry | process |
//!
//! The first layer that mentions a site decides. A deletion at any layer
//! means the site has no set, without consulting lower layers.
//!
//! ## Overlay Computation
//!
//! A mutation is reconciled against the manual and public layers into a
//! context config that keeps three invariants: no set is left as a lone
//! primary, no member outlives its primary, and no site ends up in two sets.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::context_config::FirstPartySetsContextConfig;
use super::local_set::LocalSetDeclaration;
use super::mutation::{SetsMutation, SingleSet};
use super::public_sets::{PublicSets, RegistryError};
use super::union_find::AdditionOverlapsUnionFind;
use crate::fingerprint::fingerprint_of;
use crate::types::{
    FirstPartySetEntry, FirstPartySetEntryOverride, FirstPartySetMetadata, SchemefulSite, SiteType, Version,
};

type Overlay = BTreeMap<SchemefulSite, FirstPartySetEntryOverride>;

/// Record an override unless the site already has one.
fn add_override(overlay: &mut Overlay, site: &SchemefulSite, entry_override: FirstPartySetEntryOverride) {
    overlay.entry(site.clone()).or_insert(entry_override);
}

fn flatten(sets: &[SingleSet]) -> SingleSet {
    sets.iter()
        .flat_map(|set| set.iter().map(|(site, entry)| (site.clone(), entry.clone())))
        .collect()
}

/// Canonical sets plus the manual overlay, with per-context resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GlobalFirstPartySets {
    public_sets_version: Version,
    public_sets: PublicSets,
    manual_config: FirstPartySetsContextConfig,
    manual_entries: SingleSet,
    manual_aliases: BTreeMap<SchemefulSite, SchemefulSite>,
    manual_set_applied: bool,
}

impl GlobalFirstPartySets {
    /// Create from registry data.
    ///
    /// An invalid `version` marks a registry that never loaded; its entries
    /// and aliases are discarded.
    pub fn new(
        public_sets_version: Version,
        entries: BTreeMap<SchemefulSite, FirstPartySetEntry>,
        aliases: BTreeMap<SchemefulSite, SchemefulSite>,
    ) -> Result<Self, RegistryError> {
        let public_sets = if public_sets_version.is_valid() {
            PublicSets::new(entries, aliases)?
        } else {
            if !entries.is_empty() {
                tracing::warn!(
                    discarded_entries = entries.len(),
                    "Registry version invalid, discarding public sets"
                );
            }
            PublicSets::default()
        };

        tracing::debug!(
            version = %public_sets_version,
            entries = public_sets.len(),
            aliases = public_sets.aliases().len(),
            "Loaded public first-party sets"
        );

        Ok(Self {
            public_sets_version,
            public_sets,
            ..Self::default()
        })
    }

    /// Version of the registry the public sets came from.
    pub fn public_sets_version(&self) -> &Version {
        &self.public_sets_version
    }

    /// The canonical layer.
    pub fn public_sets(&self) -> &PublicSets {
        &self.public_sets
    }

    /// The overlay computed from the manual set, empty if none was applied.
    pub fn manual_config(&self) -> &FirstPartySetsContextConfig {
        &self.manual_config
    }

    /// Manual set entries with aliases expanded.
    pub fn manual_entries(&self) -> &SingleSet {
        &self.manual_entries
    }

    /// Manual set aliases.
    pub fn manual_aliases(&self) -> &BTreeMap<SchemefulSite, SchemefulSite> {
        &self.manual_aliases
    }

    /// Whether neither the public nor the manual layer has data.
    pub fn is_empty(&self) -> bool {
        self.public_sets.is_empty() && self.manual_config.is_empty()
    }

    /// Deterministic fingerprint of the full resolved state.
    pub fn fingerprint(&self) -> String {
        fingerprint_of(self)
    }

    /// Apply a locally declared set on top of the public sets.
    ///
    /// # Panics
    /// If a manual set was already applied.
    pub fn apply_manually_specified_set(&mut self, local_set: &LocalSetDeclaration) {
        assert!(
            !self.manual_set_applied,
            "manually specified set may only be applied once"
        );
        self.manual_set_applied = true;

        if local_set.is_empty() {
            return;
        }

        self.manual_config = self.compute_config(&local_set.compute_mutation());
        self.manual_entries = local_set.expanded_entries();
        self.manual_aliases = local_set.aliases().clone();

        tracing::info!(
            primary = ?local_set.primary().map(ToString::to_string),
            members = self.manual_entries.len(),
            overrides = self.manual_config.len(),
            "Applied manually specified set"
        );
    }

    /// Look up the effective entry for `site`.
    ///
    /// The site's scheme is normalized first. Layers are consulted in order:
    /// `config`, manual config, then alias-resolved public sets.
    pub fn find_entry(
        &self,
        site: &SchemefulSite,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> Option<FirstPartySetEntry> {
        let normalized = site.normalized();

        if let Some(entry_override) = config.and_then(|c| c.find_override(&normalized)) {
            return entry_override.entry().cloned();
        }
        if let Some(entry_override) = self.manual_config.find_override(&normalized) {
            return entry_override.entry().cloned();
        }
        self.public_sets.find_canonical_entry(&normalized).cloned()
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

    /// Whether `site`, `top_frame_site` and every site in `party_context` share one set.
    ///
    /// False when `site` has no set, or when any other site resolves to no
    /// set or to a different primary.
    pub fn is_context_same_party_with_site<'a, I>(
        &self,
        site: &SchemefulSite,
        top_frame_site: Option<&SchemefulSite>,
        party_context: I,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> bool
    where
        I: IntoIterator<Item = &'a SchemefulSite>,
    {
        let Some(site_entry) = self.find_entry(site, config) else {
            return false;
        };
        let shares_primary = |other: &SchemefulSite| {
            self.find_entry(other, config)
                .is_some_and(|entry| entry.primary() == site_entry.primary())
        };

        if let Some(top_frame_site) = top_frame_site {
            if !shares_primary(top_frame_site) {
                return false;
            }
        }
        party_context.into_iter().all(shares_primary)
    }

    /// Whether `a` and `b` resolve to the same set.
    pub fn are_sites_in_same_set(
        &self,
        a: &SchemefulSite,
        b: &SchemefulSite,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> bool {
        self.is_context_same_party_with_site(a, Some(b), std::iter::empty(), config)
    }

    /// Same-party verdict plus the resolved frame and top-frame entries.
    pub fn compute_metadata<'a, I>(
        &self,
        site: &SchemefulSite,
        top_frame_site: Option<&SchemefulSite>,
        party_context: I,
        config: Option<&FirstPartySetsContextConfig>,
    ) -> FirstPartySetMetadata
    where
        I: IntoIterator<Item = &'a SchemefulSite>,
    {
        let same_party = self.is_context_same_party_with_site(site, top_frame_site, party_context, config);
        let frame_entry = self.find_entry(site, config);
        let top_frame_entry = top_frame_site.and_then(|top| self.find_entry(top, config));
        FirstPartySetMetadata::new(same_party, frame_entry, top_frame_entry)
    }

    /// Visit every effective (site, entry) pair exactly once.
    ///
    /// Precedence matches [`find_entry`](Self::find_entry); deleted sites are
    /// skipped. Public aliases are visited with their canonical entry. Stops
    /// when `f` returns `false`; returns whether iteration completed.
    pub fn for_each_effective_set_entry<F>(&self, config: Option<&FirstPartySetsContextConfig>, mut f: F) -> bool
    where
        F: FnMut(&SchemefulSite, &FirstPartySetEntry) -> bool,
    {
        if let Some(config) = config {
            let completed = config.for_each_customization_entry(|site, entry_override| match entry_override.entry() {
                Some(entry) => f(site, entry),
                None => true,
            });
            if !completed {
                return false;
            }
        }

        let in_config = |site: &SchemefulSite| config.is_some_and(|c| c.contains(site));

        let completed = self.manual_config.for_each_customization_entry(|site, entry_override| {
            if in_config(site) {
                return true;
            }
            match entry_override.entry() {
                Some(entry) => f(site, entry),
                None => true,
            }
        });
        if !completed {
            return false;
        }

        self.public_sets.for_each_public_set_entry(|site, entry| {
            if in_config(site) || self.manual_config.contains(site) {
                return true;
            }
            f(site, entry)
        })
    }

    /// Reconcile a mutation against the current sets into a context overlay.
    ///
    /// The replacement and addition sets become literal overrides. Derived
    /// overrides then keep the result consistent:
    ///
    /// - members of a canonical set that an addition set overlaps move to the
    ///   addition set's primary
    /// - members of a canonical set whose primary was replaced are deleted
    /// - canonical primaries left with no members are deleted
    /// - public and manual aliases of overridden sites are deleted
    ///
    /// Literal overrides always win over derived ones.
    pub fn compute_config(&self, mutation: &SetsMutation) -> FirstPartySetsContextConfig {
        if mutation.is_empty() {
            return FirstPartySetsContextConfig::default();
        }

        let normalized_additions = self.normalize_addition_sets(mutation.additions());
        let flattened_replacements = flatten(mutation.replacements());
        let flattened_additions = flatten(&normalized_additions);

        let mut overlay = Overlay::new();
        for (site, entry) in flattened_replacements.iter().chain(flattened_additions.iter()) {
            add_override(&mut overlay, site, entry.clone().into());
        }

        // Old primary → entry of the addition set taking over its set.
        let mut addition_intersected_primaries: BTreeMap<SchemefulSite, FirstPartySetEntry> = BTreeMap::new();
        for (member, new_entry) in &flattened_additions {
            if let Some(existing) = self.find_entry(member, None) {
                addition_intersected_primaries
                    .entry(existing.primary().clone())
                    .or_insert_with(|| new_entry.clone());
            }
        }

        // Old primary → its members that a replacement set took away.
        let mut potential_singletons: BTreeMap<SchemefulSite, BTreeSet<SchemefulSite>> = BTreeMap::new();
        for member in flattened_replacements.keys() {
            let Some(existing) = self.find_entry(member, None) else {
                continue;
            };
            let old_primary = existing.primary();
            if old_primary == member {
                continue;
            }
            if !addition_intersected_primaries.contains_key(old_primary)
                && !flattened_replacements.contains_key(old_primary)
            {
                potential_singletons
                    .entry(old_primary.clone())
                    .or_default()
                    .insert(member.clone());
            }
        }

        // Replacement-set sites that currently own a canonical set.
        let replaced_existing_primaries: BTreeSet<SchemefulSite> = flattened_replacements
            .keys()
            .filter(|site| {
                self.find_entry(site, None)
                    .is_some_and(|existing| existing.primary() == *site)
            })
            .cloned()
            .collect();

        if !addition_intersected_primaries.is_empty()
            || !potential_singletons.is_empty()
            || !replaced_existing_primaries.is_empty()
        {
            // Policy sets of other contexts must not leak in: scan without a config.
            self.for_each_effective_set_entry(None, |member, entry| {
                let primary = entry.primary();

                if let Some(new_entry) = addition_intersected_primaries.get(primary) {
                    if !flattened_replacements.contains_key(member) {
                        let site_type = if member == new_entry.primary() {
                            SiteType::Primary
                        } else {
                            SiteType::Associated
                        };
                        add_override(
                            &mut overlay,
                            member,
                            FirstPartySetEntry::new(new_entry.primary().clone(), site_type, None).into(),
                        );
                    }
                }

                // An alias of either layer stands in for its canonical site.
                let canonical = self.alias_target(member).unwrap_or(member);
                if canonical == primary {
                    return true;
                }

                if potential_singletons
                    .get(primary)
                    .is_some_and(|lost| !lost.contains(member) && !lost.contains(canonical))
                {
                    // `member` stays behind, so the primary is not a singleton.
                    potential_singletons.remove(primary);
                }

                if replaced_existing_primaries.contains(primary)
                    && !flattened_replacements.contains_key(member)
                    && !addition_intersected_primaries.contains_key(primary)
                {
                    tracing::trace!(member = %member, primary = %primary, "Deleting member orphaned by replaced primary");
                    add_override(&mut overlay, member, FirstPartySetEntryOverride::Deletion);
                }
                true
            });

            for primary in potential_singletons.keys() {
                tracing::trace!(primary = %primary, "Deleting primary left as singleton");
                add_override(&mut overlay, primary, FirstPartySetEntryOverride::Deletion);
            }
        }

        // An alias must not silently follow its canonical site into a new set.
        for (alias, canonical) in self.public_sets.aliases().iter().chain(&self.manual_aliases) {
            if overlay.contains_key(canonical) && !overlay.contains_key(alias) {
                add_override(&mut overlay, alias, FirstPartySetEntryOverride::Deletion);
            }
        }

        tracing::debug!(
            replacement_sets = mutation.replacements().len(),
            addition_sets = mutation.additions().len(),
            normalized_addition_sets = normalized_additions.len(),
            overrides = overlay.len(),
            "Computed first-party sets context config"
        );

        FirstPartySetsContextConfig::new(overlay)
    }

    /// Canonical site of `site` if it is a public or manual alias.
    fn alias_target(&self, site: &SchemefulSite) -> Option<&SchemefulSite> {
        self.public_sets
            .aliases()
            .get(site)
            .or_else(|| self.manual_aliases.get(site))
    }

    /// Merge addition sets that overlap the same canonical set.
    ///
    /// Each group keeps the set with the lowest index; the other sets' sites
    /// join it as associated members of its primary.
    fn normalize_addition_sets(&self, addition_sets: &[SingleSet]) -> Vec<SingleSet> {
        // Canonical primary → indices of addition sets overlapping its set.
        let mut overlaps: BTreeMap<SchemefulSite, BTreeSet<usize>> = BTreeMap::new();
        for (index, set) in addition_sets.iter().enumerate() {
            for site in set.keys() {
                if let Some(existing) = self.find_entry(site, None) {
                    overlaps.entry(existing.primary().clone()).or_default().insert(index);
                }
            }
        }

        let mut union_find = AdditionOverlapsUnionFind::new(addition_sets.len());
        for indices in overlaps.values() {
            if let Some(&first) = indices.iter().next() {
                for &index in indices {
                    union_find.union(first, index);
                }
            }
        }

        union_find
            .sets_mapping()
            .into_iter()
            .map(|(representative, children)| {
                let mut normalized = addition_sets[representative].clone();
                let Some(primary) = normalized.values().next().map(|e| e.primary().clone()) else {
                    return normalized;
                };
                for child in children {
                    for site in addition_sets[child].keys() {
                        let previous = normalized.insert(
                            site.clone(),
                            FirstPartySetEntry::new(primary.clone(), SiteType::Associated, None),
                        );
                        assert!(previous.is_none(), "addition sets must be disjoint");
                    }
                }
                normalized
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SiteIndex;

    fn site(s: &str) -> SchemefulSite {
        SchemefulSite::parse(s).unwrap()
    }

    fn primary(p: &str) -> FirstPartySetEntry {
        FirstPartySetEntry::primary_of(site(p))
    }

    fn associated(p: &str) -> FirstPartySetEntry {
        FirstPartySetEntry::new(site(p), SiteType::Associated, None)
    }

    fn indexed(p: &str, index: u32) -> FirstPartySetEntry {
        FirstPartySetEntry::new(site(p), SiteType::Associated, Some(SiteIndex::new(index)))
    }

    fn set_of(p: &str, members: &[&str]) -> SingleSet {
        let mut set = SingleSet::from([(site(p), primary(p))]);
        for m in members {
            set.insert(site(m), associated(p));
        }
        set
    }

    /// a.test: {a, b, c}; x.test: {x, y}.
    fn global() -> GlobalFirstPartySets {
        GlobalFirstPartySets::new(
            Version::parse("1.0"),
            BTreeMap::from([
                (site("https://a.test"), primary("https://a.test")),
                (site("https://b.test"), indexed("https://a.test", 0)),
                (site("https://c.test"), indexed("https://a.test", 1)),
                (site("https://x.test"), primary("https://x.test")),
                (site("https://y.test"), indexed("https://x.test", 0)),
            ]),
            BTreeMap::from([(site("https://c.example"), site("https://c.test"))]),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_version_discards_entries() {
        let sets = GlobalFirstPartySets::new(
            Version::invalid(),
            BTreeMap::from([(site("https://a.test"), primary("https://a.test"))]),
            BTreeMap::new(),
        )
        .unwrap();
        assert!(sets.is_empty());
        assert_eq!(sets.find_entry(&site("https://a.test"), None), None);
    }

    #[test]
    fn test_empty_mutation_yields_empty_config() {
        let sets = global();
        assert!(sets.compute_config(&SetsMutation::default()).is_empty());
        let empty_sets = SetsMutation::new(vec![SingleSet::new()], vec![]).unwrap();
        assert!(sets.compute_config(&empty_sets).is_empty());
    }

    #[test]
    fn test_replacement_of_all_members_deletes_singleton() {
        let sets = global();
        // b and c each become primaries of their own new sets.
        let mutation = SetsMutation::new(
            vec![set_of("https://b.test", &["https://b2.test"]), set_of("https://c.test", &["https://c2.test"])],
            vec![],
        )
        .unwrap();
        let config = sets.compute_config(&mutation);

        assert_eq!(sets.find_entry(&site("https://a.test"), Some(&config)), None);
        assert_eq!(sets.find_entry(&site("https://b.test"), Some(&config)), Some(primary("https://b.test")));
        assert!(config.find_override(&site("https://a.test")).unwrap().is_deletion());
    }

    #[test]
    fn test_replacement_of_one_member_keeps_set() {
        let sets = global();
        let mutation = SetsMutation::new(vec![set_of("https://b.test", &["https://b2.test"])], vec![]).unwrap();
        let config = sets.compute_config(&mutation);

        assert_eq!(sets.find_entry(&site("https://a.test"), Some(&config)), Some(primary("https://a.test")));
        assert_eq!(sets.find_entry(&site("https://c.test"), Some(&config)), Some(indexed("https://a.test", 1)));
        assert!(!config.contains(&site("https://a.test")));
    }

    #[test]
    fn test_replaced_primary_orphans_members() {
        let sets = global();
        let mutation = SetsMutation::new(vec![set_of("https://x.test", &["https://z.test"])], vec![]).unwrap();
        let config = sets.compute_config(&mutation);

        assert_eq!(sets.find_entry(&site("https://z.test"), Some(&config)), Some(associated("https://x.test")));
        assert_eq!(sets.find_entry(&site("https://y.test"), Some(&config)), None);
        assert!(config.find_override(&site("https://y.test")).unwrap().is_deletion());
    }

    #[test]
    fn test_addition_reparents_intersected_set() {
        let sets = global();
        // n.test adds itself over y.test, taking x.test's set along.
        let mutation = SetsMutation::new(vec![], vec![set_of("https://n.test", &["https://y.test"])]).unwrap();
        let config = sets.compute_config(&mutation);

        assert_eq!(sets.find_entry(&site("https://y.test"), Some(&config)), Some(associated("https://n.test")));
        assert_eq!(sets.find_entry(&site("https://x.test"), Some(&config)), Some(associated("https://n.test")));
        assert!(sets.are_sites_in_same_set(&site("https://x.test"), &site("https://n.test"), Some(&config)));
    }

    #[test]
    fn test_addition_sets_merge_on_shared_canonical_set() {
        let sets = global();
        // Both addition sets overlap a.test's set; index 0 supplies the primary.
        let mutation = SetsMutation::new(
            vec![],
            vec![
                set_of("https://p.test", &["https://b.test"]),
                set_of("https://q.test", &["https://c.test"]),
            ],
        )
        .unwrap();
        let config = sets.compute_config(&mutation);

        for member in ["https://a.test", "https://b.test", "https://c.test", "https://q.test"] {
            assert_eq!(
                sets.find_entry(&site(member), Some(&config)).map(|e| e.primary().clone()),
                Some(site("https://p.test")),
                "{member} should belong to p.test"
            );
        }
        assert_eq!(sets.find_entry(&site("https://q.test"), Some(&config)), Some(associated("https://p.test")));
    }

    #[test]
    #[should_panic(expected = "addition sets must be disjoint")]
    fn test_overlapping_addition_sets_panic() {
        let sets = global();
        // Both sets reach a.test and both list z.test.
        sets.normalize_addition_sets(&[
            set_of("https://p.test", &["https://b.test", "https://z.test"]),
            set_of("https://q.test", &["https://c.test", "https://z.test"]),
        ]);
    }

    #[test]
    fn test_alias_of_overridden_site_is_deleted() {
        let sets = global();
        let mutation = SetsMutation::new(vec![set_of("https://c.test", &["https://c2.test"])], vec![]).unwrap();
        let config = sets.compute_config(&mutation);

        assert!(config.find_override(&site("https://c.example")).unwrap().is_deletion());
        assert_eq!(sets.find_entry(&site("https://c.example"), Some(&config)), None);
        assert_eq!(sets.find_entry(&site("https://c.example"), None), Some(indexed("https://a.test", 1)));
    }

    #[test]
    fn test_manual_set_layer() {
        let mut sets = global();
        let local = LocalSetDeclaration::create(set_of("https://m.test", &["https://y.test"]), BTreeMap::new()).unwrap();
        sets.apply_manually_specified_set(&local);

        assert_eq!(sets.find_entry(&site("https://y.test"), None), Some(associated("https://m.test")));
        // x.test lost its only member.
        assert_eq!(sets.find_entry(&site("https://x.test"), None), None);
        assert_eq!(sets.manual_entries().len(), 2);

        // A context config still overrides the manual layer.
        let config = FirstPartySetsContextConfig::from_iter([(site("https://y.test"), FirstPartySetEntryOverride::Deletion)]);
        assert_eq!(sets.find_entry(&site("https://y.test"), Some(&config)), None);
    }

    #[test]
    #[should_panic(expected = "only be applied once")]
    fn test_manual_set_applied_twice_panics() {
        let mut sets = global();
        sets.apply_manually_specified_set(&LocalSetDeclaration::default());
        sets.apply_manually_specified_set(&LocalSetDeclaration::default());
    }

    #[test]
    fn test_same_party_context() {
        let sets = global();
        let (a, b, c, x) = (site("https://a.test"), site("https://b.test"), site("https://c.test"), site("https://x.test"));

        assert!(sets.is_context_same_party_with_site(&b, Some(&a), [&c], None));
        assert!(sets.is_context_same_party_with_site(&b, None, [], None));
        assert!(!sets.is_context_same_party_with_site(&b, Some(&a), [&x], None));
        assert!(!sets.is_context_same_party_with_site(&b, Some(&x), [], None));
        assert!(!sets.is_context_same_party_with_site(&site("https://nope.test"), None, [], None));
        assert!(!sets.is_context_same_party_with_site(&b, Some(&site("https://nope.test")), [], None));
    }

    #[test]
    fn test_compute_metadata() {
        let sets = global();
        let meta = sets.compute_metadata(&site("wss://b.test"), Some(&site("https://c.example")), [], None);
        assert!(meta.same_party);
        assert_eq!(meta.frame_entry, Some(indexed("https://a.test", 0)));
        assert_eq!(meta.top_frame_entry, Some(indexed("https://a.test", 1)));
        assert!(meta.are_sites_in_same_first_party_set());
    }

    #[test]
    fn test_for_each_effective_set_entry_respects_layers() {
        let sets = global();
        let config = FirstPartySetsContextConfig::from_iter([
            (site("https://b.test"), FirstPartySetEntryOverride::Deletion),
            (site("https://n.test"), associated("https://a.test").into()),
        ]);

        let mut seen = BTreeMap::new();
        assert!(sets.for_each_effective_set_entry(Some(&config), |s, e| {
            assert!(seen.insert(s.clone(), e.clone()).is_none(), "{s} visited twice");
            true
        }));

        assert!(!seen.contains_key(&site("https://b.test")));
        assert!(seen.contains_key(&site("https://n.test")));
        assert!(seen.contains_key(&site("https://c.example")));
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_fingerprint_changes_with_manual_set() {
        let before = global();
        let mut after = global();
        let local = LocalSetDeclaration::create(set_of("https://m.test", &["https://y.test"]), BTreeMap::new()).unwrap();
        after.apply_manually_specified_set(&local);

        assert_eq!(before.fingerprint(), global().fingerprint());
        assert_ne!(before.fingerprint(), after.fingerprint());
    }
}
