//! Site key type for set membership.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// `scheme://host[:port][path]`; only scheme and host are kept.
const SITE_PATTERN: &str = r"^([a-z][a-z0-9+.\-]*)://([a-z0-9\-]+(?:\.[a-z0-9\-]+)*)(?::[0-9]{1,5})?(?:[/?#].*)?$";

fn site_regex() -> &'static regex_lite::Regex {
    static SITE_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    SITE_REGEX.get_or_init(|| regex_lite::Regex::new(SITE_PATTERN).expect("site pattern must compile"))
}

/// Error returned when a string cannot be turned into a site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteError {
    /// The input is not of the form `scheme://registrable-domain`.
    #[error("Invalid site: {0:?}")]
    InvalidSite(String),
}

/// A site: scheme plus registrable domain.
///
/// The host is taken as already reduced to its registrable domain (eTLD+1);
/// computing that reduction is the caller's job. Ordering is by scheme, then
/// domain, giving deterministic iteration in the `BTreeMap`s used throughout
/// the crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemefulSite {
    scheme: String,
    registrable_domain: String,
}

impl SchemefulSite {
    /// Parse a site from a URL-like string.
    ///
    /// Scheme and host are lowercased; port, path, query and fragment are dropped.
    pub fn parse(input: &str) -> Result<Self, SiteError> {
        let lowered = input.trim().to_ascii_lowercase();
        let captures = site_regex()
            .captures(&lowered)
            .ok_or_else(|| SiteError::InvalidSite(input.to_string()))?;

        Ok(Self {
            scheme: captures[1].to_string(),
            registrable_domain: captures[2].to_string(),
        })
    }

    /// The scheme, lowercased.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The registrable domain, lowercased.
    pub fn registrable_domain(&self) -> &str {
        &self.registrable_domain
    }

    /// Map websocket schemes onto the HTTP schemes they upgrade from.
    ///
    /// `ws` becomes `http` and `wss` becomes `https`; every other site is
    /// returned unchanged. All lookups in this crate go through this first.
    pub fn normalized(&self) -> Self {
        let scheme = match self.scheme.as_str() {
            "ws" => "http",
            "wss" => "https",
            _ => return self.clone(),
        };
        Self {
            scheme: scheme.to_string(),
            registrable_domain: self.registrable_domain.clone(),
        }
    }
}

impl fmt::Display for SchemefulSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.registrable_domain)
    }
}

impl FromStr for SchemefulSite {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SchemefulSite {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemefulSite {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
