use super::hooks::*;

use std::time::*;

/// Default cache duration (5 minutes).
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Default storage key for the cache snapshot.
pub const DEFAULT_CACHE_STORAGE_KEY: &str = "httpCache";

//
// CachingConfiguration
//

/// Caching configuration.
#[derive(Clone)]
pub struct CachingConfiguration {
    /// Cache duration when neither the response nor the hook provides one.
    pub default_duration: Duration,

    /// Cacheable by default.
    pub cacheable_by_default: bool,

    /// Cache duration (hook).
    pub cache_duration: Option<CacheDurationHook>,
}

impl Default for CachingConfiguration {
    fn default() -> Self {
        Self { default_duration: DEFAULT_CACHE_DURATION, cacheable_by_default: true, cache_duration: None }
    }
}
