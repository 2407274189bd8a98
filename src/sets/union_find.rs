//! Union-find over addition-set indices.
//!
//! Addition sets that overlap the same canonical set must collapse into one,
//! and the collapse is transitive. The representative of every group is the
//! lowest original index in it, so the earliest-listed addition set always
//! supplies the surviving primary.

use std::collections::{BTreeMap, BTreeSet};

/// Maps each representative index to the indices merged into it.
///
/// The representative itself is not listed among its children.
pub type SetsMapping = BTreeMap<usize, BTreeSet<usize>>;

/// Disjoint-set forest over `[0, num_sets)`.
#[derive(Debug, Clone)]
pub struct AdditionOverlapsUnionFind {
    representatives: Vec<usize>,
}

impl AdditionOverlapsUnionFind {
    /// Create a forest where every index is its own representative.
    pub fn new(num_sets: usize) -> Self {
        Self {
            representatives: (0..num_sets).collect(),
        }
    }

    /// Number of indices tracked.
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    /// Whether no indices are tracked.
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Merge the groups containing `set_x` and `set_y`.
    ///
    /// The smaller root becomes the parent.
    ///
    /// # Panics
    /// If either index is out of range.
    pub fn union(&mut self, set_x: usize, set_y: usize) {
        self.check_index(set_x);
        self.check_index(set_y);

        let root_x = self.find(set_x);
        let root_y = self.find(set_y);
        if root_x == root_y {
            return;
        }
        let (parent, child) = if root_x < root_y {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.representatives[child] = parent;
    }

    /// Find the representative of `set`, compressing the path behind it.
    ///
    /// # Panics
    /// If the index is out of range.
    pub fn find(&mut self, set: usize) -> usize {
        self.check_index(set);

        let mut root = set;
        while self.representatives[root] != root {
            root = self.representatives[root];
        }

        let mut current = set;
        while self.representatives[current] != root {
            let next = self.representatives[current];
            self.representatives[current] = root;
            current = next;
        }
        root
    }

    /// Group every index under its representative.
    ///
    /// Every representative appears as a key, including ones nothing was
    /// merged into.
    pub fn sets_mapping(&mut self) -> SetsMapping {
        let mut mapping = SetsMapping::new();
        for index in 0..self.representatives.len() {
            let representative = self.find(index);
            debug_assert!(representative <= index);
            let children = mapping.entry(representative).or_default();
            if representative != index {
                children.insert(index);
            }
        }
        mapping
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.representatives.len(),
            "addition set index {} out of range for {} sets",
            index,
            self.representatives.len()
        );
    }
}
