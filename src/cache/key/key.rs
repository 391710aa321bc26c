use super::resource::*;

use {
    http::{header::*, *},
    serde::*,
    std::{borrow::*, fmt},
};

//
// CacheKey
//

/// Cache key.
///
/// The canonical identity of a cacheable request: its full URI, including the query. The
/// method is not part of the key because only GET requests are ever cached.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Constructor.
    pub fn new<KeyT>(key: KeyT) -> Self
    where
        KeyT: Into<String>,
    {
        Self(key.into())
    }

    /// Create a cache key for a request.
    pub fn for_request(_method: &Method, uri: &Uri, _headers: &HeaderMap) -> Self {
        Self(uri.to_string())
    }

    /// As string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource path (path segments only, without origin and query).
    pub fn resource_path(&self) -> ResourcePath {
        ResourcePath::parse(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.into())
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, formatter)
    }
}

//
// CacheKeyForRequest
//

/// [CacheKey] for [Request].
pub trait CacheKeyForRequest {
    /// Create a cache key.
    fn cache_key(&self) -> CacheKey;
}

impl<RequestBodyT> CacheKeyForRequest for Request<RequestBodyT> {
    fn cache_key(&self) -> CacheKey {
        CacheKey::for_request(self.method(), self.uri(), self.headers())
    }
}
