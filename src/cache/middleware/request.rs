use super::{super::key::*, configuration::*, hooks::*};

use {bytes::*, http::*};

//
// CacheableRequest
//

/// Cacheable request.
pub trait CacheableRequest {
    /// May call `cacheable_by_request` hook.
    fn should_skip_cache<CacheT>(&self, configuration: &MiddlewareCachingConfiguration<CacheT>) -> bool;

    /// May call `cache_key` hook.
    fn cache_key_with_hook<CacheT>(&self, configuration: &MiddlewareCachingConfiguration<CacheT>) -> CacheKey;
}

impl CacheableRequest for Request<Bytes> {
    fn should_skip_cache<CacheT>(&self, configuration: &MiddlewareCachingConfiguration<CacheT>) -> bool {
        if configuration.cache.is_none() {
            tracing::debug!("skip (disabled)");
            return true;
        }

        let method = self.method();
        if *method != Method::GET {
            tracing::debug!("skip ({})", method);
            return true;
        }

        let path = ResourcePath::parse(&self.uri().to_string());
        if configuration.uncacheable.iter().any(|uncacheable| path.contains(uncacheable)) {
            tracing::debug!("skip (uncacheable): {}", self.uri());
            return true;
        }

        if let Some(cacheable) = &configuration.cacheable_by_request
            && !cacheable(CacheableHookContext::new(self.uri(), self.headers()))
        {
            tracing::debug!("skip (cacheable_by_request=false)");
            return true;
        }

        false
    }

    fn cache_key_with_hook<CacheT>(&self, configuration: &MiddlewareCachingConfiguration<CacheT>) -> CacheKey {
        let mut cache_key = self.cache_key();

        if let Some(cache_key_hook) = &configuration.cache_key {
            cache_key_hook(CacheKeyHookContext::new(&mut cache_key, self));
        }

        cache_key
    }
}
