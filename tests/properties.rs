//! Property tests for lookup normalization and addition-set merging.

use std::collections::BTreeMap;

use first_party_sets::{
    AdditionOverlapsUnionFind, FirstPartySetEntry, FirstPartySetEntryOverride, FirstPartySetsContextConfig,
    GlobalFirstPartySets, SchemefulSite, SiteType, Version,
};
use proptest::prelude::*;

const DOMAINS: [&str; 6] = ["a.test", "b.test", "c.test", "d.test", "e.test", "f.test"];
const SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

fn site(scheme: &str, domain: &str) -> SchemefulSite {
    SchemefulSite::parse(&format!("{scheme}://{domain}")).unwrap()
}

/// https a.test owns b/c, http d.test owns e; f.test is unaffiliated.
fn sets() -> GlobalFirstPartySets {
    let entry = |scheme: &str, p: &str, site_type| FirstPartySetEntry::new(site(scheme, p), site_type, None);
    GlobalFirstPartySets::new(
        Version::parse("1"),
        BTreeMap::from([
            (site("https", "a.test"), entry("https", "a.test", SiteType::Primary)),
            (site("https", "b.test"), entry("https", "a.test", SiteType::Associated)),
            (site("https", "c.test"), entry("https", "a.test", SiteType::Service)),
            (site("http", "d.test"), entry("http", "d.test", SiteType::Primary)),
            (site("http", "e.test"), entry("http", "d.test", SiteType::Associated)),
        ]),
        BTreeMap::new(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn find_entry_is_normalization_invariant(
        scheme in prop::sample::select(SCHEMES.to_vec()),
        domain in prop::sample::select(DOMAINS.to_vec()),
        delete in any::<bool>(),
    ) {
        let sets = sets();
        let queried = site(scheme, domain);
        let config = if delete {
            FirstPartySetsContextConfig::from_iter([(queried.normalized(), FirstPartySetEntryOverride::Deletion)])
        } else {
            FirstPartySetsContextConfig::default()
        };

        prop_assert_eq!(
            sets.find_entry(&queried, Some(&config)),
            sets.find_entry(&queried.normalized(), Some(&config))
        );
        if delete {
            prop_assert_eq!(sets.find_entry(&queried, Some(&config)), None);
        }
    }

    #[test]
    fn union_find_representative_is_group_minimum(
        size in 1usize..24,
        unions in prop::collection::vec((0usize..24, 0usize..24), 0..40),
    ) {
        let mut uf = AdditionOverlapsUnionFind::new(size);
        for (x, y) in unions.iter().filter(|(x, y)| *x < size && *y < size) {
            uf.union(*x, *y);
        }

        let mapping = uf.sets_mapping();
        let mut covered = 0;
        for (representative, children) in &mapping {
            prop_assert_eq!(uf.find(*representative), *representative);
            prop_assert!(!children.contains(representative));
            for child in children {
                prop_assert!(child > representative);
                prop_assert_eq!(uf.find(*child), *representative);
            }
            covered += 1 + children.len();
        }
        prop_assert_eq!(covered, size);
    }
}
