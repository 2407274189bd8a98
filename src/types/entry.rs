//! Membership records for a single site.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::site::SchemefulSite;

/// Role of a site within its set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SiteType {
    /// The site naming the set.
    Primary,
    /// A member with a user-visible affiliation to the primary.
    Associated,
    /// A member serving infrastructure for the primary.
    Service,
}

impl SiteType {
    /// Parse site type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "associated" => Some(Self::Associated),
            "service" => Some(Self::Service),
            _ => None,
        }
    }
}

impl fmt::Display for SiteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Associated => write!(f, "associated"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Ordinal position of a site within its set's declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteIndex(u32);

impl SiteIndex {
    /// Create a new index.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw index value.
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// One site's membership record.
///
/// Primaries and entries created by policy carry no index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirstPartySetEntry {
    primary: SchemefulSite,
    site_type: SiteType,
    site_index: Option<SiteIndex>,
}

impl FirstPartySetEntry {
    /// Create a new entry.
    pub fn new(primary: SchemefulSite, site_type: SiteType, site_index: Option<SiteIndex>) -> Self {
        Self {
            primary,
            site_type,
            site_index,
        }
    }

    /// The entry for a primary site: self-owned, no index.
    pub fn primary_of(primary: SchemefulSite) -> Self {
        Self::new(primary, SiteType::Primary, None)
    }

    /// The primary site of the set this entry belongs to.
    pub fn primary(&self) -> &SchemefulSite {
        &self.primary
    }

    /// Role of the site in its set.
    pub fn site_type(&self) -> SiteType {
        self.site_type
    }

    /// Ordinal index, if the declaration assigned one.
    pub fn site_index(&self) -> Option<SiteIndex> {
        self.site_index
    }
}

impl fmt::Display for FirstPartySetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}", self.primary, self.site_type)?;
        if let Some(index) = self.site_index {
            write!(f, ", {}", index.value())?;
        }
        write!(f, "}}")
    }
}
