use super::{
    super::{super::headers::*, configuration::*, hooks::CacheDurationHookContext},
    configuration::*,
    hooks::*,
};

use {bytes::*, duration_str::*, http::*, serde_json::Value, std::time::*};

//
// UpstreamResponse
//

/// Upstream response.
pub trait UpstreamResponse {
    /// Check if we should skip the cache.
    ///
    /// If the response passes all our checks then we turn to the hook to give it one last chance
    /// to skip the cache.
    fn should_skip_cache<CacheT>(&self, uri: &Uri, configuration: &MiddlewareCachingConfiguration<CacheT>) -> bool;

    /// Cache duration.
    ///
    /// `XX-Cache-Duration` overrides the `cache_duration` hook, which overrides the default.
    fn cache_duration(&self, uri: &Uri, configuration: &CachingConfiguration) -> Duration;

    /// Body as JSON.
    fn json_payload(&self) -> Option<Value>;

    /// Remove our control headers.
    fn remove_cache_headers(&mut self);
}

impl UpstreamResponse for Response<Bytes> {
    fn should_skip_cache<CacheT>(&self, uri: &Uri, configuration: &MiddlewareCachingConfiguration<CacheT>) -> bool {
        let headers = self.headers();
        let status = self.status();

        if !headers.xx_cache(configuration.inner.cacheable_by_default) {
            tracing::debug!("skip ({}=false)", XX_CACHE);
            return true;
        }

        if !status.is_success() {
            tracing::debug!("skip (status={})", status.as_u16());
            return true;
        }

        if let Some(cacheable) = &configuration.cacheable_by_response
            && !cacheable(CacheableHookContext::new(uri, headers))
        {
            tracing::debug!("skip (cacheable_by_response=false)");
            return true;
        }

        false
    }

    fn cache_duration(&self, uri: &Uri, configuration: &CachingConfiguration) -> Duration {
        let duration = match self.headers().xx_cache_duration() {
            Some(duration) => duration,
            None => configuration
                .cache_duration
                .as_ref()
                .and_then(|duration| duration(CacheDurationHookContext::new(uri, self.status(), self.headers())))
                .unwrap_or(configuration.default_duration),
        };

        tracing::debug!("duration: {}", duration.human_format());
        duration
    }

    fn json_payload(&self) -> Option<Value> {
        match serde_json::from_slice(self.body()) {
            Ok(payload) => Some(payload),
            Err(error) => {
                tracing::debug!("skip (not JSON: {})", error);
                None
            }
        }
    }

    fn remove_cache_headers(&mut self) {
        let headers = self.headers_mut();
        headers.remove(XX_CACHE);
        headers.remove(XX_CACHE_DURATION);
    }
}
