use super::key::*;

use {
    http::*,
    std::{sync::*, time::*},
};

/// Hook to choose how long a stored read stays live.
///
/// Returning [None] falls back to the default duration.
pub type CacheDurationHook = Arc<Box<dyn Fn(CacheDurationHookContext) -> Option<Duration> + Send + Sync>>;

//
// CacheDurationHookContext
//

/// Context for [CacheDurationHook].
///
/// Only successful responses get this far, so `status` is always 2xx.
pub struct CacheDurationHookContext<'this> {
    /// Request URI.
    pub uri: &'this Uri,

    /// Response status.
    pub status: StatusCode,

    /// Response headers.
    pub headers: &'this HeaderMap,
}

impl<'this> CacheDurationHookContext<'this> {
    /// Constructor.
    pub fn new(uri: &'this Uri, status: StatusCode, headers: &'this HeaderMap) -> Self {
        Self { uri, status, headers }
    }

    /// Whether the request was for (or under) the resource, matched on path segments.
    ///
    /// Convenient for per-resource durations, e.g. keeping profiles around longer than
    /// microservice status.
    pub fn is_under(&self, resource: &str) -> bool {
        ResourcePath::parse(&self.uri.to_string()).contains(&ResourcePath::parse(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_under() {
        let uri = Uri::from_static("http://localhost:8080/api/dashboard/environments/e1/microservices");
        let headers = HeaderMap::new();
        let context = CacheDurationHookContext::new(&uri, StatusCode::OK, &headers);

        assert!(context.is_under("/dashboard/environments"));
        assert!(context.is_under("microservices"));
        assert!(!context.is_under("/dashboard/environment"));
    }
}
