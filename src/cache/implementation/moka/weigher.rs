use super::super::super::{entry::*, key::*};

/// Moka cache entry weigher.
///
/// An estimate of the entry's storage requirements in bytes: the key plus the serialized
/// payload.
pub fn weigher(cache_key: &CacheKey, entry: &CacheEntry) -> u32 {
    let payload_size = serde_json::to_string(&entry.payload).map(|payload| payload.len()).unwrap_or_default();
    let weight = cache_key.as_str().len() + payload_size;
    let weight = weight.try_into().unwrap_or(u32::MAX);
    tracing::debug!("{} for {}", weight, cache_key);
    weight
}
