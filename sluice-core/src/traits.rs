//! Cache collaborator traits and the owned subscription handle.
//!
//! The bridge never reimplements a cache; it consumes one through these
//! traits. A producer-side cache must be readable and observable, a
//! consumer-side cache must be writable. In-memory implementations for
//! tests live in `sluice-test-utils`.

use crate::entry::{DehydratedEntry, EntryKey, MutationRecord};
use crate::error::CacheError;
use crate::event::CacheEvent;

/// Observer of a cache's change-event feed.
///
/// Invocations are serialized by the surrounding runtime's event loop;
/// implementations must be synchronous and must not block.
pub trait CacheObserver: Send + Sync {
    fn on_cache_event(&self, event: &CacheEvent);
}

/// Subscription side of a cache collaborator.
pub trait CacheEvents {
    /// Register an observer for every subsequent change event.
    ///
    /// The returned [`Subscription`] owns the registration: dropping or
    /// disposing it detaches the observer.
    fn subscribe(&self, observer: std::sync::Arc<dyn CacheObserver>) -> Subscription;
}

/// Read side of a producer cache.
pub trait CacheReader<P> {
    /// Serialize the current value and status of one entry, or `None` if
    /// the entry no longer exists in the cache.
    fn dehydrated_entry(&self, key: &EntryKey) -> Option<DehydratedEntry<P>>;

    /// Outstanding mutation records at this moment, read fresh per flush.
    fn outstanding_mutations(&self) -> Vec<MutationRecord<P>>;
}

/// Write side of a consumer cache. Upserts must be idempotent per key:
/// re-applying an already-applied entry is expected and must be a no-op in
/// effect.
pub trait CacheWriter<P> {
    fn upsert_entry(&self, entry: DehydratedEntry<P>) -> Result<(), CacheError>;

    fn upsert_mutation(&self, record: MutationRecord<P>) -> Result<(), CacheError>;
}

/// Owned handle for one cache subscription.
///
/// The registration lives exactly as long as this handle: call
/// [`Subscription::dispose`] when the owning session ends, or rely on drop.
/// This replaces the pattern of a process-global subscription with no
/// teardown, which leaks observers in a long-lived host process.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that has nothing to detach.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Explicitly release the subscription.
    pub fn dispose(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
