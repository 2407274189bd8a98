//! Core value types for set membership.

pub mod site;
pub mod entry;
pub mod entry_override;
pub mod metadata;
pub mod version;

pub use site::{SchemefulSite, SiteError};
pub use entry::{FirstPartySetEntry, SiteIndex, SiteType};
pub use entry_override::FirstPartySetEntryOverride;
pub use metadata::FirstPartySetMetadata;
pub use version::Version;
