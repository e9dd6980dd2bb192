// ABOUTME: Minimal synchronous signal used to broadcast toast collection changes
// Emission walks a snapshot of subscribers and skips any unsubscribed mid-flight

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    active: Arc<AtomicBool>,
    handler: Handler,
}

pub(crate) struct Signal {
    name: &'static str,
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl Signal {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: AtomicU64::new(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Subscriber {
            id,
            active: Arc::new(AtomicBool::new(true)),
            handler: Arc::new(handler),
        });
        tracing::debug!("Subscribed {:?} to {} signal", id, self.name);
        id
    }

    /// Returns false if `id` was not subscribed.
    ///
    /// Takes effect for every emission that has not yet reached this handler,
    /// including one already in flight on the calling thread. An emission
    /// running on another thread that has already passed this handler's
    /// active check may still call it once; after that emission finishes no
    /// further calls happen.
    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        match subscribers.iter().position(|s| s.id == id) {
            Some(index) => {
                let removed = subscribers.remove(index);
                removed.active.store(false, Ordering::SeqCst);
                tracing::debug!("Unsubscribed {:?} from {} signal", id, self.name);
                true
            }
            None => false,
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Call every active handler once, in subscription order.
    pub(crate) fn emit(&self) {
        // Handlers may subscribe or unsubscribe while we iterate
        let snapshot: Vec<(Arc<AtomicBool>, Handler)> = self
            .lock()
            .iter()
            .map(|s| (s.active.clone(), s.handler.clone()))
            .collect();

        for (active, handler) in snapshot {
            if active.load(Ordering::SeqCst) {
                handler();
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
