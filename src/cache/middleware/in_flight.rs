use super::super::key::*;

use {
    futures::{channel::oneshot, future::*},
    parking_lot::Mutex,
    std::{collections::*, fmt, sync::Arc},
};

/// Resolves when the leading request for a key is done (successfully or not).
pub type InFlightCompletion = Shared<oneshot::Receiver<()>>;

type InFlightMap = Arc<Mutex<HashMap<CacheKey, InFlightCompletion>>>;

//
// InFlightRequests
//

/// Tracks cacheable requests that are waiting on upstream, keyed like the cache.
///
/// The first request for a key becomes the leader and goes to the network. Requests for the
/// same key arriving before the leader is done become followers: they wait for the leader and
/// then consult the cache instead of making their own network call.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct InFlightRequests {
    requests: InFlightMap,
}

impl InFlightRequests {
    /// Join the in-flight request for a key, or lead a new one.
    pub fn join(&self, key: &CacheKey) -> InFlight {
        let mut requests = self.requests.lock();

        if let Some(completion) = requests.get(key) {
            return InFlight::Follower(completion.clone());
        }

        let (sender, receiver) = oneshot::channel();
        requests.insert(key.clone(), receiver.shared());

        InFlight::Leader(InFlightGuard { key: key.clone(), requests: self.requests.clone(), sender: Some(sender) })
    }

    /// Number of keys with a request in flight.
    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    /// True if there are no requests in flight.
    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

impl fmt::Debug for InFlightRequests {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.debug_struct("InFlightRequests").field("len", &self.len()).finish()
    }
}

//
// InFlight
//

/// Role of a request in [InFlightRequests].
pub enum InFlight {
    /// Go to the network. Followers are released when the guard is dropped.
    Leader(InFlightGuard),

    /// Wait for the leader.
    Follower(InFlightCompletion),
}

//
// InFlightGuard
//

/// Held by the leading request.
///
/// Dropping it (including when the leader's future is dropped) removes the key and releases the
/// followers, so it should be dropped only after the cache has been written.
pub struct InFlightGuard {
    key: CacheKey,
    requests: InFlightMap,
    sender: Option<oneshot::Sender<()>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.requests.lock().remove(&self.key);
        if let Some(sender) = self.sender.take() {
            // Followers may all be gone
            let _ = sender.send(());
        }
    }
}
