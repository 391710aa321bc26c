use super::{
    super::super::{super::clock::*, cache::*, entry::*, key::*},
    expiry::*,
    weigher::*,
};

use {serde_json::Value, std::time::*};

//
// MokaCacheImplementation
//

/// Moka cache implementation.
///
/// Memory only: nothing is persisted, so entries do not survive a restart. Dead entries are
/// evicted by Moka itself and thus never returned by [get](Cache::get).
///
/// Based on the `sync` version of Moka cache because our [Cache] is not `async`.
#[derive(Clone)]
pub struct MokaCacheImplementation {
    cache: moka::sync::Cache<CacheKey, CacheEntry>,
    clock: ClockRef,
}

impl MokaCacheImplementation {
    /// Constructor.
    ///
    /// `max_capacity` is the limit for the total of entry weights (see [weigher]).
    pub fn new(max_capacity: u64, clock: ClockRef) -> Self {
        let cache = moka::sync::Cache::builder()
            .name("http")
            .max_capacity(max_capacity)
            .weigher(weigher)
            .expire_after(CacheEntryExpiry::new(clock.clone()))
            .build();

        Self { cache, clock }
    }

    /// Number of entries.
    ///
    /// Approximate until pending maintenance tasks have run.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Cache for MokaCacheImplementation {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.cache.get(key)
    }

    fn put(&self, key: CacheKey, payload: Value, duration: Duration) {
        let entry = CacheEntry::new(key.clone(), payload, self.clock.now(), duration);
        self.cache.insert(key, entry)
    }

    fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key)
    }

    fn invalidate_matching(&self, invalidation: &Invalidation) -> usize {
        let keys: Vec<_> = self
            .cache
            .iter()
            .filter(|(key, _)| invalidation.matches(key))
            .map(|(key, _)| key)
            .collect();

        for key in &keys {
            tracing::debug!("invalidate ({}): {}", invalidation, key);
            self.cache.invalidate(&**key);
        }

        keys.len()
    }

    fn invalidate_all(&self) {
        self.cache.invalidate_all()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry.is_expired_at(self.clock.now())
    }
}
