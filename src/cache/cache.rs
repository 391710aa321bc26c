use super::{entry::*, key::*};

use {serde_json::Value, std::time::*};

//
// Cache
//

/// Cache.
///
/// Implementations should ensure that cloning is cheap and clones always refer to the same shared
/// state.
///
/// All operations are synchronous: nothing here waits on the network.
pub trait Cache
where
    Self: 'static + Clone + Send + Sync,
{
    /// Get an entry from the cache.
    ///
    /// May return a dead entry. Check it with [is_expired](Cache::is_expired).
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Put an entry in the cache, expiring after `duration`.
    fn put(&self, key: CacheKey, payload: Value, duration: Duration);

    /// Invalidate a cache entry.
    fn invalidate(&self, key: &CacheKey);

    /// Invalidate all cache entries selected by the [Invalidation].
    ///
    /// Returns the number of invalidated entries.
    fn invalidate_matching(&self, invalidation: &Invalidation) -> usize;

    /// Invalidate all cache entries.
    fn invalidate_all(&self);

    /// Whether an entry is dead.
    fn is_expired(&self, entry: &CacheEntry) -> bool;
}
