use super::{
    super::{configuration::*, key::*},
    hooks::*,
};

/// Routes that are never cached.
pub const DEFAULT_UNCACHEABLE_ROUTES: &[&str] = &["/login", "/register", "/health"];

//
// MiddlewareCachingConfiguration
//

/// Middleware caching configuration.
#[derive(Clone)]
pub struct MiddlewareCachingConfiguration<CacheT> {
    /// Cache.
    pub cache: Option<CacheT>,

    /// Requests whose paths contain any of these are never cached.
    pub uncacheable: Vec<ResourcePath>,

    /// Cacheable by request (hook).
    pub cacheable_by_request: Option<CacheableHook>,

    /// Cacheable by response (hook).
    pub cacheable_by_response: Option<CacheableHook>,

    /// Cache key (hook).
    pub cache_key: Option<CacheKeyHook>,

    /// Coalesce concurrent identical requests.
    pub coalesce_in_flight: bool,

    /// Inner configuration.
    pub inner: CachingConfiguration,
}

impl<CacheT> Default for MiddlewareCachingConfiguration<CacheT> {
    fn default() -> Self {
        Self {
            cache: None,
            uncacheable: DEFAULT_UNCACHEABLE_ROUTES.iter().map(|route| ResourcePath::parse(route)).collect(),
            cacheable_by_request: None,
            cacheable_by_response: None,
            cache_key: None,
            coalesce_in_flight: true,
            inner: Default::default(),
        }
    }
}
