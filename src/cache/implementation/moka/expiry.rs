use super::super::super::{super::clock::*, entry::*, key::*};

use {duration_str::*, moka::*, std::time::*};

//
// CacheEntryExpiry
//

/// Moka [Expiry] for [CacheEntry].
///
/// Entries already carry their absolute expiry, so we translate it into a time to live
/// relative to the [Clock].
pub struct CacheEntryExpiry {
    clock: ClockRef,
}

impl CacheEntryExpiry {
    /// Constructor.
    pub fn new(clock: ClockRef) -> Self {
        Self { clock }
    }

    fn time_to_live(&self, entry: &CacheEntry) -> Option<Duration> {
        let duration = entry.time_to_live(self.clock.now());
        tracing::debug!("storing with duration: {}", duration.human_format());
        Some(duration)
    }
}

impl Expiry<CacheKey, CacheEntry> for CacheEntryExpiry {
    fn expire_after_create(&self, _cache_key: &CacheKey, entry: &CacheEntry, _created_at: Instant) -> Option<Duration> {
        self.time_to_live(entry)
    }

    fn expire_after_update(
        &self,
        _cache_key: &CacheKey,
        entry: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.time_to_live(entry)
    }
}
