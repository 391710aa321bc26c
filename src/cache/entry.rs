use super::{super::clock::*, key::*};

use {
    bytes::*,
    http::{header::*, *},
    serde::*,
    serde_json::Value,
    std::time::*,
};

//
// CacheEntry
//

/// Cache entry.
///
/// Once `expires_at` has passed the entry is logically dead, even if it is still physically
/// present in the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Key.
    pub key: CacheKey,

    /// Response body (opaque to the cache).
    pub payload: Value,

    /// Absolute expiry (milliseconds since the Unix epoch).
    pub expires_at: Timestamp,
}

impl CacheEntry {
    /// Constructor.
    pub fn new(key: CacheKey, payload: Value, now: Timestamp, duration: Duration) -> Self {
        let expires_at = now.saturating_add(duration.as_millis() as Timestamp);
        Self { key, payload, expires_at }
    }

    /// Whether the entry is dead at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Time left to live at `now`.
    pub fn time_to_live(&self, now: Timestamp) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now))
    }

    /// Create a synthetic response.
    ///
    /// Status is always 200. The [CacheStatus::Hit] extension marks it as served from the cache.
    pub fn to_response(&self) -> Response<Bytes> {
        // Serializing a Value cannot fail
        let body = serde_json::to_vec(&self.payload).unwrap_or_default();

        let mut response = Response::new(Bytes::from(body));
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response.extensions_mut().insert(CacheStatus::Hit);
        response
    }
}

//
// CacheStatus
//

/// Response extension describing how the caching stage handled a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheStatus {
    /// Served from the cache without network I/O.
    Hit,

    /// Fetched from upstream and stored.
    Miss,
}
