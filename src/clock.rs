use std::{
    fmt,
    sync::{atomic::*, *},
    time::*,
};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Common reference type for [Clock].
pub type ClockRef = Arc<dyn Clock>;

//
// Clock
//

/// Wall clock.
///
/// Cache entry and token expiry are both measured against it.
pub trait Clock
where
    Self: fmt::Debug + Send + Sync,
{
    /// Now, in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

//
// SystemClock
//

/// [Clock] backed by [SystemTime].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis() as Timestamp)
            .unwrap_or_default()
    }
}

//
// ManualClock
//

/// [Clock] that only moves when told to.
///
/// Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Constructor.
    pub fn new(now: Timestamp) -> Self {
        Self { now: Arc::new(AtomicU64::new(now)) }
    }

    /// Set the time.
    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move the time forward.
    pub fn advance(&self, duration: Duration) {
        self.now.fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
