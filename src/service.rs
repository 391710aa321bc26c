use super::{
    cache::{middleware::*, *},
    error::*,
};

use {
    bytes::*,
    http::{request::*, response::*},
    kutil::std::future::*,
    std::{mem, result::Result, task::*},
    tower::*,
};

//
// CachingService
//

/// HTTP response caching service.
///
/// You will often be using [CachingLayer](super::CachingLayer) rather than this service directly,
/// thus this service's functionality is documented there.
pub struct CachingService<InnerServiceT, CacheT = ResponseCache>
where
    CacheT: Cache,
{
    inner_service: InnerServiceT,
    caching: MiddlewareCachingConfiguration<CacheT>,
    in_flight: InFlightRequests,
}

impl<InnerServiceT, CacheT> CachingService<InnerServiceT, CacheT>
where
    CacheT: Cache,
{
    /// Constructor.
    pub fn new(
        inner_service: InnerServiceT,
        caching: MiddlewareCachingConfiguration<CacheT>,
        in_flight: InFlightRequests,
    ) -> Self {
        Self { inner_service, caching, in_flight }
    }

    // Clone while keeping `inner_service`.
    //
    // See: https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
    fn clone_and_keep_inner_service(&mut self) -> Self
    where
        InnerServiceT: Clone,
    {
        let mut clone = self.clone();
        clone.inner_service = mem::replace(&mut self.inner_service, clone.inner_service);
        clone
    }

    // Handle request.
    async fn handle(mut self, request: Request<Bytes>) -> Result<Response<Bytes>, PipelineError>
    where
        InnerServiceT: Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError>,
    {
        if request.should_skip_cache(&self.caching) {
            return self.inner_service.call(request).await;
        }

        let Some(cache) = self.caching.cache.clone() else {
            return self.inner_service.call(request).await;
        };

        let cache_key = request.cache_key_with_hook(&self.caching);

        if let Some(cached_response) = lookup(&cache, &cache_key) {
            return Ok(cached_response);
        }

        // The guard must live until after we store the response
        let _guard = if self.caching.coalesce_in_flight {
            match self.in_flight.join(&cache_key) {
                InFlight::Leader(guard) => Some(guard),

                InFlight::Follower(completion) => {
                    tracing::debug!("wait (in flight): {}", cache_key);

                    // Canceled just means that the leader was dropped
                    let _ = completion.await;

                    if let Some(cached_response) = lookup(&cache, &cache_key) {
                        return Ok(cached_response);
                    }

                    None
                }
            }
        } else {
            None
        };

        tracing::debug!("miss: {}", cache_key);

        // Capture request data before moving the request to the inner service
        let uri = request.uri().clone();

        let mut upstream_response = self.inner_service.call(request).await?;

        if !upstream_response.should_skip_cache(&uri, &self.caching)
            && let Some(payload) = upstream_response.json_payload()
        {
            let duration = upstream_response.cache_duration(&uri, &self.caching.inner);
            tracing::debug!("store: {}", cache_key);
            cache.put(cache_key, payload, duration);
            upstream_response.extensions_mut().insert(CacheStatus::Miss);
        }

        upstream_response.remove_cache_headers();
        Ok(upstream_response)
    }
}

// Live entry as a synthetic response.
//
// A dead entry is deleted so that the caller will refetch.
fn lookup<CacheT>(cache: &CacheT, cache_key: &CacheKey) -> Option<Response<Bytes>>
where
    CacheT: Cache,
{
    let entry = cache.get(cache_key)?;

    if cache.is_expired(&entry) {
        tracing::debug!("expired: {}", cache_key);
        cache.invalidate(cache_key);
        None
    } else {
        tracing::debug!("hit: {}", cache_key);
        Some(entry.to_response())
    }
}

impl<InnerServiceT, CacheT> Clone for CachingService<InnerServiceT, CacheT>
where
    InnerServiceT: Clone,
    CacheT: Cache,
{
    fn clone(&self) -> Self {
        Self {
            inner_service: self.inner_service.clone(),
            caching: self.caching.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<InnerServiceT, CacheT> Service<Request<Bytes>> for CachingService<InnerServiceT, CacheT>
where
    InnerServiceT:
        'static + Service<Request<Bytes>, Response = Response<Bytes>, Error = PipelineError> + Clone + Send,
    InnerServiceT::Future: Send,
    CacheT: Cache,
{
    type Response = Response<Bytes>;
    type Error = PipelineError;
    type Future = CapturedFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, context: &mut Context) -> Poll<Result<(), Self::Error>> {
        // Note that on a cache hit we technically don't need the inner service to be ready,
        // however Tower's design does not allow us to optimize here
        self.inner_service.poll_ready(context)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let cloned_self = self.clone_and_keep_inner_service();
        capture_async! { cloned_self.handle(request).await }
    }
}
