//! Set resolution: canonical sets, overlays and the algorithms joining them.
//!
//! ## Architecture
//!
//! ```text
//! LocalSetDeclaration ─┐
//!                      ├→ SetsMutation → GlobalFirstPartySets::compute_config → FirstPartySetsContextConfig
//! policy sets ─────────┘                        ↓
//!                                     PublicSets (registry) + manual config
//! ```

pub mod union_find;
pub mod validator;
pub mod mutation;
pub mod local_set;
pub mod context_config;
pub mod public_sets;
pub mod global_sets;

pub use union_find::{AdditionOverlapsUnionFind, SetsMapping};
pub use validator::FirstPartySetsValidator;
pub use mutation::{MutationError, SetsMutation, SingleSet};
pub use local_set::{LocalSetDeclaration, LocalSetError};
pub use context_config::FirstPartySetsContextConfig;
pub use public_sets::{PublicSets, RegistryError};
pub use global_sets::GlobalFirstPartySets;
