use super::{
    cache::{middleware::*, *},
    service::*,
};

use {
    std::{sync::*, time::*},
    tower::*,
};

//
// CachingLayer
//

/// Client-side HTTP response caching layer.
///
/// This layer configures and installs a [CachingService]. It is a read-through memoization
/// layer for GET requests, with time-based expiry. Invalidation after writes is explicit: see
/// [ResponseCache::invalidate_resource] and [ResponseCache::delete_all_related].
///
/// The cache implementation is provided as a generic type parameter. [ResponseCache] persists
/// its entries to durable storage so they survive a restart.
///
/// Usage notes
/// ===========
///
/// 1. By default every successful JSON response to a GET is cached. You can "punch through"
///    this behavior via the `XX-Cache` response header (which will be removed before the
///    response is delivered): set it to "false" to skip caching.
///
///    You can also configure for "opt-in", *requiring* the header to be "true". See
///    [cacheable_by_default](Self::cacheable_by_default).
///
/// 2. Alternatively, you can provide [cacheable_by_request](Self::cacheable_by_request) and/or
///    [cacheable_by_response](Self::cacheable_by_response) hooks. (If not provided they are
///    assumed to return true.)
///
/// 3. The cache duration is taken from the `XX-Cache-Duration` response header if present
///    (parsed using [duration-str](https://github.com/baoyachi/duration-str)), otherwise from the
///    [cache_duration](Self::cache_duration) hook, otherwise it is the
///    [default_duration](Self::default_duration) of 5 minutes.
///
/// 4. Routes in the [uncacheable](Self::uncacheable) set are never cached. By default these are
///    login, register, and health checks. Routes are matched on path segments, so "/health"
///    matches "/api/health" but not "/api/healthchecks".
///
/// Request handling
/// ================
///
/// 1. A request arrives. Check if it is cacheable. Reasons it won't be:
///
///    * Caching is disabled for this layer (no cache)
///    * The method is not GET
///    * The path is in the uncacheable set
///    * The [cacheable_by_request](Self::cacheable_by_request) hook returns false
///
///    If it is not cacheable then it is passed through untouched. END.
///
/// 2. Compute the cache key (the full URI with query) and give the [cache_key](Self::cache_key)
///    hook a chance to change it.
///
/// 3. If we have a live entry then short-circuit with a synthetic 200 response built from the
///    cached payload, with no network I/O. END.
///
///    If we have a dead entry then delete it and continue as a miss.
///
/// 4. If another request for the same key is already in flight (and
///    [coalesce_in_flight](Self::coalesce_in_flight) is enabled) then wait for it and look in the
///    cache again. A hit ends here, otherwise we continue on our own.
///
/// 5. Send the request upstream. The upstream response is stored only if:
///
///    * Its status code is "success" (200 to 299)
///    * Its `XX-Cache` header is not "false"
///    * The [cacheable_by_response](Self::cacheable_by_response) hook agrees
///    * Its body is JSON
///
/// 6. Deliver the upstream response as is (minus our control headers). END.
pub struct CachingLayer<CacheT = ResponseCache>
where
    CacheT: Cache,
{
    caching: MiddlewareCachingConfiguration<CacheT>,
    in_flight: InFlightRequests,
}

impl<CacheT> CachingLayer<CacheT>
where
    CacheT: Cache,
{
    /// Enable cache.
    ///
    /// Not enabled by default.
    pub fn cache(mut self, cache: CacheT) -> Self {
        self.caching.cache = Some(cache);
        self
    }

    /// Routes that are never cached.
    ///
    /// The default is [DEFAULT_UNCACHEABLE_ROUTES].
    pub fn uncacheable<RouteT>(mut self, routes: impl IntoIterator<Item = RouteT>) -> Self
    where
        RouteT: AsRef<str>,
    {
        self.caching.uncacheable = routes.into_iter().map(|route| ResourcePath::parse(route.as_ref())).collect();
        self
    }

    /// If a response does not specify the `XX-Cache` response header then this we will assume its
    /// value is this.
    ///
    /// The default is true.
    pub fn cacheable_by_default(mut self, cacheable_by_default: bool) -> Self {
        self.caching.inner.cacheable_by_default = cacheable_by_default;
        self
    }

    /// Provide a hook to test whether a request is cacheable.
    ///
    /// Will only be called after all internal conditions are met, giving you one last chance to
    /// prevent caching.
    ///
    /// Note that the headers are *request* headers. This hook is called before we have the
    /// upstream response.
    ///
    /// [None] by default.
    pub fn cacheable_by_request(
        mut self,
        cacheable_by_request: impl Fn(CacheableHookContext) -> bool + 'static + Send + Sync,
    ) -> Self {
        self.caching.cacheable_by_request = Some(Arc::new(Box::new(cacheable_by_request)));
        self
    }

    /// Provide a hook to test whether an upstream response is cacheable.
    ///
    /// Will only be called after all internal conditions are met, giving you one last chance to
    /// prevent caching.
    ///
    /// Note that the headers are *response* headers.
    ///
    /// [None] by default.
    pub fn cacheable_by_response(
        mut self,
        cacheable_by_response: impl Fn(CacheableHookContext) -> bool + 'static + Send + Sync,
    ) -> Self {
        self.caching.cacheable_by_response = Some(Arc::new(Box::new(cacheable_by_response)));
        self
    }

    /// Provide a hook to update a request's cache key.
    ///
    /// [None] by default.
    pub fn cache_key(mut self, cache_key: impl Fn(CacheKeyHookContext) + 'static + Send + Sync) -> Self {
        self.caching.cache_key = Some(Arc::new(Box::new(cache_key)));
        self
    }

    /// Provide a hook to get a response's cache duration.
    ///
    /// Will only be called if an `XX-Cache-Duration` response header is *not* provided. In other
    /// words, `XX-Cache-Duration` will always override this value. If the hook returns [None]
    /// then the [default_duration](Self::default_duration) is used.
    ///
    /// Note that the headers are *response* headers.
    ///
    /// [None] by default.
    pub fn cache_duration(
        mut self,
        cache_duration: impl Fn(CacheDurationHookContext) -> Option<Duration> + 'static + Send + Sync,
    ) -> Self {
        self.caching.inner.cache_duration = Some(Arc::new(Box::new(cache_duration)));
        self
    }

    /// Cache duration when neither the response nor the hook provides one.
    ///
    /// The default is [DEFAULT_CACHE_DURATION].
    pub fn default_duration(mut self, default_duration: Duration) -> Self {
        self.caching.inner.default_duration = default_duration;
        self
    }

    /// Share in-flight request tracking with other layers.
    ///
    /// Layers built separately only coalesce requests with each other if they share this. By
    /// default every layer has its own.
    pub fn in_flight(mut self, in_flight: InFlightRequests) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Whether concurrent identical requests share one upstream call.
    ///
    /// The default is true.
    pub fn coalesce_in_flight(mut self, coalesce_in_flight: bool) -> Self {
        self.caching.coalesce_in_flight = coalesce_in_flight;
        self
    }
}

impl<CacheT> Clone for CachingLayer<CacheT>
where
    CacheT: Cache,
{
    fn clone(&self) -> Self {
        Self { caching: self.caching.clone(), in_flight: self.in_flight.clone() }
    }
}

impl<CacheT> Default for CachingLayer<CacheT>
where
    CacheT: Cache,
{
    fn default() -> Self {
        Self { caching: Default::default(), in_flight: Default::default() }
    }
}

impl<InnerServiceT, CacheT> Layer<InnerServiceT> for CachingLayer<CacheT>
where
    CacheT: Cache,
{
    type Service = CachingService<InnerServiceT, CacheT>;

    fn layer(&self, inner_service: InnerServiceT) -> Self::Service {
        CachingService::new(inner_service, self.caching.clone(), self.in_flight.clone())
    }
}
