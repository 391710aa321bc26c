use super::{key::*, resource::*};

use std::fmt;

//
// Invalidation
//

/// Selects the cache entries related to a changed resource.
///
/// False positives (over-invalidation) are acceptable, false negatives are not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invalidation {
    /// Every key containing the string.
    Substring(String),

    /// Every key whose path contains the resource's segments as a contiguous run.
    Resource(ResourcePath),
}

impl Invalidation {
    /// Substring invalidation.
    pub fn substring<SubstringT>(substring: SubstringT) -> Self
    where
        SubstringT: Into<String>,
    {
        Self::Substring(substring.into())
    }

    /// Resource invalidation.
    pub fn resource(url: &str) -> Self {
        Self::Resource(ResourcePath::parse(url))
    }

    /// Whether a key is selected.
    pub fn matches(&self, key: &CacheKey) -> bool {
        match self {
            Self::Substring(substring) => key.as_str().contains(substring.as_str()),
            Self::Resource(resource) => key.resource_path().contains(resource),
        }
    }
}

impl fmt::Display for Invalidation {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Substring(substring) => write!(formatter, "*{}*", substring),
            Self::Resource(resource) => write!(formatter, "{}", resource),
        }
    }
}
