//! # first-party-sets
//!
//! Layered First-Party Set (Related Website Sets) membership resolution.
//!
//! The crate answers one question:
//!
//! > Given a site, which set does it belong to, and is a frame context same-party?
//!
//! ## Core Contract
//!
//! 1. A canonical registry snapshot ([`PublicSets`]) maps member sites to their primary
//! 2. One locally declared test set may be applied on top, exactly once
//! 3. Policy mutations are reconciled into a per-context overlay ([`FirstPartySetsContextConfig`])
//! 4. Queries resolve through the layers with fixed precedence
//!
//! ## Architecture
//!
//! ```text
//! Registry → PublicSets ─┐
//! LocalSetDeclaration ───┼→ GlobalFirstPartySets → find_entry / compute_metadata
//! SetsMutation ──────────┘          ↓
//!                       FirstPartySetsContextConfig (per context)
//! ```
//!
//! ## Invariants
//!
//! - No set is left as a primary without members
//! - No member outlives its set's primary
//! - No site belongs to two sets
//! - Every query normalizes `ws`/`wss` to `http`/`https` first

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod sets;
mod fingerprint;
pub mod settings;

// Re-exports
pub use types::{
    FirstPartySetEntry, FirstPartySetEntryOverride, FirstPartySetMetadata, SchemefulSite, SiteError, SiteIndex,
    SiteType, Version,
};
pub use sets::{
    AdditionOverlapsUnionFind, FirstPartySetsContextConfig, FirstPartySetsValidator, GlobalFirstPartySets,
    LocalSetDeclaration, LocalSetError, MutationError, PublicSets, RegistryError, SetsMapping, SetsMutation,
    SingleSet,
};
pub use settings::{FirstPartySetsSettings, SettingsError};
