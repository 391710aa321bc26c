use super::{
    super::{clock::*, error::*, storage::*},
    cache::*,
    configuration::*,
    entry::*,
    key::*,
};

use {
    parking_lot::RwLock,
    serde_json::Value,
    std::{
        collections::*,
        sync::{Arc, atomic::*},
        time::*,
    },
};

//
// ResponseCache
//

/// Persistent response cache.
///
/// A keyed, TTL-based store of previously fetched read results. Every mutation synchronously
/// writes a snapshot of the whole store into [Storage], and [restore](ResponseCacheBuilder::restore)
/// rehydrates it, so entries survive a restart.
///
/// Persistence is best effort. If a snapshot write fails (e.g. the storage quota is exceeded)
/// the failure is logged and the cache continues in memory only until it is
/// [cleared](Self::clear).
///
/// Clones share the same store.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    inner: Arc<ResponseCacheInner>,
}

#[derive(Debug)]
struct ResponseCacheInner {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    storage: StorageRef,
    storage_key: String,
    clock: ClockRef,
    default_duration: Duration,
    memory_only: AtomicBool,
}

impl ResponseCache {
    /// Builder.
    pub fn builder(storage: StorageRef) -> ResponseCacheBuilder {
        ResponseCacheBuilder::new(storage)
    }

    /// Get an entry.
    ///
    /// No side effects. The entry may be dead; check it with [is_expired](Self::is_expired).
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.inner.entries.read().get(key).cloned()
    }

    /// Set an entry with the default duration.
    pub fn set<KeyT>(&self, key: KeyT, payload: Value)
    where
        KeyT: Into<CacheKey>,
    {
        self.set_with_duration(key, payload, self.inner.default_duration)
    }

    /// Set an entry.
    ///
    /// Overwrites any existing entry for the key. `expires_at` will be now plus `duration`.
    pub fn set_with_duration<KeyT>(&self, key: KeyT, payload: Value, duration: Duration)
    where
        KeyT: Into<CacheKey>,
    {
        let key = key.into();
        let entry = CacheEntry::new(key.clone(), payload, self.inner.clock.now(), duration);

        let mut entries = self.inner.entries.write();
        entries.insert(key, entry);
        self.persist(&entries);
    }

    /// Delete an entry.
    pub fn delete(&self, key: &str) {
        let mut entries = self.inner.entries.write();
        if entries.remove(key).is_some() {
            tracing::debug!("delete: {}", key);
        }
        self.persist(&entries);
    }

    /// Delete all entries with keys containing the substring.
    ///
    /// Coarse: "clusters" will also match "clustersets". See
    /// [invalidate_resource](Self::invalidate_resource) for segment-aligned matching.
    ///
    /// Returns the number of deleted entries.
    pub fn delete_all_related(&self, substring: &str) -> usize {
        self.delete_matching(&Invalidation::substring(substring))
    }

    /// Delete all entries with paths containing the resource path's segments.
    ///
    /// Returns the number of deleted entries.
    pub fn invalidate_resource(&self, url: &str) -> usize {
        self.delete_matching(&Invalidation::resource(url))
    }

    /// Delete all entries selected by the [Invalidation].
    ///
    /// Returns the number of deleted entries.
    pub fn delete_matching(&self, invalidation: &Invalidation) -> usize {
        let mut entries = self.inner.entries.write();

        let before = entries.len();
        entries.retain(|key, _| {
            if invalidation.matches(key) {
                tracing::debug!("delete ({}): {}", invalidation, key);
                false
            } else {
                true
            }
        });
        let deleted = before - entries.len();

        self.persist(&entries);
        deleted
    }

    /// Delete all entries and remove the snapshot from storage.
    ///
    /// Also re-enables persistence if it had been disabled by a failure.
    pub fn clear(&self) {
        let mut entries = self.inner.entries.write();
        entries.clear();

        if let Err(error) = self.inner.storage.remove_item(&self.inner.storage_key) {
            tracing::warn!("could not remove cache snapshot: {}", error);
        }

        self.inner.memory_only.store(false, Ordering::SeqCst);
    }

    /// Whether an entry is dead.
    pub fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry.is_expired_at(self.inner.clock.now())
    }

    /// Physically remove dead entries.
    ///
    /// Returns the number of removed entries.
    pub fn sweep(&self) -> usize {
        let now = self.inner.clock.now();
        let mut entries = self.inner.entries.write();

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let swept = before - entries.len();

        if swept != 0 {
            tracing::debug!("swept: {}", swept);
            self.persist(&entries);
        }

        swept
    }

    /// Number of entries, dead ones included.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Keys (in no particular order).
    pub fn keys(&self) -> Vec<CacheKey> {
        self.inner.entries.read().keys().cloned().collect()
    }

    /// Default duration.
    pub fn default_duration(&self) -> Duration {
        self.inner.default_duration
    }

    /// True if a persistence failure has switched us to memory only.
    pub fn is_memory_only(&self) -> bool {
        self.inner.memory_only.load(Ordering::SeqCst)
    }

    // Must be called while holding the write lock so that snapshots are written in order.
    fn persist(&self, entries: &HashMap<CacheKey, CacheEntry>) {
        if self.is_memory_only() {
            return;
        }

        let snapshot: Vec<_> = entries.iter().collect();
        let result = serde_json::to_string(&snapshot)
            .map_err(StorageError::from)
            .and_then(|snapshot| self.inner.storage.set_item(&self.inner.storage_key, &snapshot));

        if let Err(error) = result {
            tracing::warn!("could not persist cache, continuing in memory only: {}", error);
            self.inner.memory_only.store(true, Ordering::SeqCst);

            // No older snapshot may outlive the switch to memory only
            if let Err(error) = self.inner.storage.remove_item(&self.inner.storage_key) {
                tracing::warn!("could not remove stale cache snapshot: {}", error);
            }
        }
    }
}

impl Cache for ResponseCache {
    fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        ResponseCache::get(self, key.as_str())
    }

    fn put(&self, key: CacheKey, payload: Value, duration: Duration) {
        self.set_with_duration(key, payload, duration)
    }

    fn invalidate(&self, key: &CacheKey) {
        self.delete(key.as_str())
    }

    fn invalidate_matching(&self, invalidation: &Invalidation) -> usize {
        self.delete_matching(invalidation)
    }

    fn invalidate_all(&self) {
        self.clear()
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        ResponseCache::is_expired(self, entry)
    }
}

//
// ResponseCacheBuilder
//

/// [ResponseCache] builder.
pub struct ResponseCacheBuilder {
    storage: StorageRef,
    storage_key: String,
    clock: ClockRef,
    default_duration: Duration,
}

impl ResponseCacheBuilder {
    /// Constructor.
    pub fn new(storage: StorageRef) -> Self {
        Self {
            storage,
            storage_key: DEFAULT_CACHE_STORAGE_KEY.into(),
            clock: Arc::new(SystemClock),
            default_duration: DEFAULT_CACHE_DURATION,
        }
    }

    /// Storage key for the snapshot.
    ///
    /// The default is [DEFAULT_CACHE_STORAGE_KEY].
    pub fn storage_key<KeyT>(mut self, storage_key: KeyT) -> Self
    where
        KeyT: Into<String>,
    {
        self.storage_key = storage_key.into();
        self
    }

    /// Clock.
    ///
    /// The default is [SystemClock].
    pub fn clock(mut self, clock: ClockRef) -> Self {
        self.clock = clock;
        self
    }

    /// Default duration.
    ///
    /// The default is [DEFAULT_CACHE_DURATION].
    pub fn default_duration(mut self, default_duration: Duration) -> Self {
        self.default_duration = default_duration;
        self
    }

    /// Build an empty cache.
    ///
    /// An existing snapshot in storage is left alone until the first write replaces it.
    pub fn build(self) -> ResponseCache {
        self.build_with(Default::default())
    }

    /// Build a cache rehydrated from the snapshot in storage.
    ///
    /// A missing snapshot gives an empty cache. So does an unreadable one (after a warning).
    pub fn restore(self) -> ResponseCache {
        let entries = match self.storage.get_item(&self.storage_key) {
            Ok(Some(snapshot)) => match serde_json::from_str::<Vec<(CacheKey, CacheEntry)>>(&snapshot) {
                Ok(snapshot) => {
                    tracing::debug!("restored {} entries", snapshot.len());
                    snapshot.into_iter().collect()
                }

                Err(error) => {
                    tracing::warn!("discarding unreadable cache snapshot: {}", error);
                    Default::default()
                }
            },

            Ok(None) => Default::default(),

            Err(error) => {
                tracing::warn!("could not read cache snapshot: {}", error);
                Default::default()
            }
        };

        self.build_with(entries)
    }

    fn build_with(self, entries: HashMap<CacheKey, CacheEntry>) -> ResponseCache {
        ResponseCache {
            inner: Arc::new(ResponseCacheInner {
                entries: RwLock::new(entries),
                storage: self.storage,
                storage_key: self.storage_key,
                clock: self.clock,
                default_duration: self.default_duration,
                memory_only: AtomicBool::new(false),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn fixture() -> (ResponseCache, Arc<MemoryStorage>, ManualClock) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = ManualClock::new(10_000);
        let cache = ResponseCache::builder(storage.clone()).clock(Arc::new(clock.clone())).build();
        (cache, storage, clock)
    }

    #[test]
    fn set_then_get() {
        let (cache, _, _) = fixture();
        cache.set("/dashboard/clusters/owned", json!({"clusters": []}));

        let entry = cache.get("/dashboard/clusters/owned").unwrap();
        assert_eq!(entry.payload, json!({"clusters": []}));
        assert_eq!(entry.expires_at, 10_000 + 300_000);
    }

    #[test]
    fn overwrite_replaces_entry() {
        let (cache, _, clock) = fixture();
        cache.set("/k", json!(1));
        clock.advance(Duration::from_secs(1));
        cache.set_with_duration("/k", json!(2), Duration::from_secs(10));

        let entry = cache.get("/k").unwrap();
        assert_eq!(entry.payload, json!(2));
        assert_eq!(entry.expires_at, 21_000);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expiry_follows_the_clock() {
        let (cache, _, clock) = fixture();
        cache.set_with_duration("/k", json!(1), Duration::from_millis(100));
        let entry = cache.get("/k").unwrap();

        clock.advance(Duration::from_millis(99));
        assert!(!cache.is_expired(&entry));
        clock.advance(Duration::from_millis(1));
        assert!(cache.is_expired(&entry));

        // Still physically present until swept
        assert!(cache.get("/k").is_some());
        assert_eq!(cache.sweep(), 1);
        assert!(cache.get("/k").is_none());
    }

    #[test]
    fn delete_all_related_by_substring() {
        let (cache, _, _) = fixture();
        cache.set("a/clusters", json!(1));
        cache.set("a/clusters/1", json!(2));
        cache.set("a/projects", json!(3));

        assert_eq!(cache.delete_all_related("clusters"), 2);
        assert_eq!(cache.keys(), vec![CacheKey::from("a/projects")]);
    }

    #[test]
    fn invalidate_resource_by_segments() {
        let (cache, _, _) = fixture();
        cache.set("https://api/dashboard/clusters/owned", json!(1));
        cache.set("https://api/dashboard/clusters/7", json!(2));
        cache.set("https://api/dashboard/clustersets", json!(3));

        assert_eq!(cache.invalidate_resource("/dashboard/clusters"), 2);
        assert_eq!(cache.keys(), vec![CacheKey::from("https://api/dashboard/clustersets")]);
    }

    #[test]
    fn delete_persists() {
        let (cache, storage, _) = fixture();
        cache.set("/a", json!(1));
        cache.set("/b", json!(2));
        cache.delete("/a");

        let restored = ResponseCache::builder(storage).restore();
        assert_eq!(restored.keys(), vec![CacheKey::from("/b")]);
    }

    #[test]
    fn clear_is_idempotent() {
        let (cache, storage, _) = fixture();
        cache.set("/a", json!(1));

        for _ in 0..2 {
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(storage.get_item(DEFAULT_CACHE_STORAGE_KEY).unwrap(), None);
        }
    }

    #[test]
    fn restore_round_trip() {
        let (cache, storage, clock) = fixture();
        cache.set("/a", json!({"x": 1}));
        clock.advance(Duration::from_secs(3));
        cache.set_with_duration("/b?q=1", json!([1, 2, 3]), Duration::from_secs(1));
        cache.set("/c", Value::Null);

        let restored = ResponseCache::builder(storage).clock(Arc::new(clock.clone())).restore();
        assert_eq!(restored.len(), 3);
        for key in cache.keys() {
            assert_eq!(restored.get(key.as_str()), cache.get(key.as_str()));
        }
    }

    #[test]
    fn snapshot_is_array_of_pairs() {
        let (cache, storage, _) = fixture();
        cache.set("/a", json!(true));

        let snapshot: Value =
            serde_json::from_str(&storage.get_item(DEFAULT_CACHE_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(snapshot, json!([["/a", {"key": "/a", "payload": true, "expiresAt": 310_000}]]));
    }

    #[test]
    fn unreadable_snapshot_gives_empty_cache() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(DEFAULT_CACHE_STORAGE_KEY, "{not json").unwrap();
        let cache = ResponseCache::builder(storage).restore();
        assert!(cache.is_empty());
    }

    #[test]
    fn persistence_failure_degrades_to_memory() {
        let storage = Arc::new(MemoryStorage::with_quota(128));
        let cache = ResponseCache::builder(storage.clone()).clock(Arc::new(ManualClock::new(0))).build();

        cache.set("/small", json!(1));
        assert!(!cache.is_memory_only());

        cache.set("/big", json!("x".repeat(200)));
        assert!(cache.is_memory_only());

        // In-memory store stays authoritative
        assert_eq!(cache.get("/big").unwrap().payload, json!("x".repeat(200)));
        assert_eq!(cache.len(), 2);

        // No snapshot is left behind to restore from
        assert_eq!(storage.get_item(DEFAULT_CACHE_STORAGE_KEY).unwrap(), None);
        assert!(ResponseCache::builder(storage).restore().is_empty());

        cache.clear();
        assert!(!cache.is_memory_only());
    }

    #[test]
    fn invalidation_after_persistence_failure_survives_restart() {
        let storage = Arc::new(MemoryStorage::with_quota(400));
        let cache = ResponseCache::builder(storage.clone()).clock(Arc::new(ManualClock::new(0))).build();

        cache.set("https://api/dashboard/clusters/owned", json!(1));
        assert!(storage.get_item(DEFAULT_CACHE_STORAGE_KEY).unwrap().is_some());

        cache.set("/big", json!("x".repeat(600)));
        assert!(cache.is_memory_only());

        assert_eq!(cache.invalidate_resource("/dashboard/clusters"), 1);

        let restored = ResponseCache::builder(storage).clock(Arc::new(ManualClock::new(0))).restore();
        assert_eq!(restored.get("https://api/dashboard/clusters/owned"), None);
    }
}
