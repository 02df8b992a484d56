//! Producer-side change tracking.

use crate::traits::CacheObserver;
use sluice_core::{CacheEvent, EntryKey};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Tracks which cache entries have changed since the last flush boundary.
///
/// The tracked set is owned exclusively by one producer-side bridge
/// instance. `added` and `updated` events insert the affected key
/// (idempotently); `removed` and unknown events are ignored, because a
/// removed entry simply never appears in a subsequent flush. The set is
/// cleared exactly once per flush via [`EventTracker::drain`].
///
/// The interior mutex only satisfies the aliasing rules for a shared
/// observer; callbacks and flush boundaries are serialized by the
/// surrounding event loop, so it is never contended.
#[derive(Debug, Default)]
pub struct EventTracker {
    seen: Mutex<HashSet<EntryKey>>,
}

impl EventTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys tracked since the last drain.
    pub fn tracked_count(&self) -> usize {
        self.seen().len()
    }

    pub fn is_tracked(&self, key: &EntryKey) -> bool {
        self.seen().contains(key)
    }

    /// Take the tracked set, leaving it empty. The clear is unconditional:
    /// a drained set must never carry stale keys into the next boundary.
    pub fn drain(&self) -> HashSet<EntryKey> {
        std::mem::take(&mut *self.seen())
    }

    fn seen(&self) -> std::sync::MutexGuard<'_, HashSet<EntryKey>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheObserver for EventTracker {
    fn on_cache_event(&self, event: &CacheEvent) {
        match event {
            CacheEvent::Added { key, .. } | CacheEvent::Updated { key, .. } => {
                debug!(key = %key, cause = event.kind(), "tracking entry");
                self.seen().insert(key.clone());
            }
            CacheEvent::Removed { .. } | CacheEvent::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::EntryStatus;

    fn key(name: &str) -> EntryKey {
        EntryKey::from_identity(name.as_bytes())
    }

    #[test]
    fn test_added_and_updated_are_tracked() {
        let tracker = EventTracker::new();
        tracker.on_cache_event(&CacheEvent::Added {
            key: key("a"),
            status: EntryStatus::Pending,
        });
        tracker.on_cache_event(&CacheEvent::Updated {
            key: key("b"),
            status: EntryStatus::Success,
        });
        assert_eq!(tracker.tracked_count(), 2);
        assert!(tracker.is_tracked(&key("a")));
        assert!(tracker.is_tracked(&key("b")));
    }

    #[test]
    fn test_removed_and_other_are_ignored() {
        let tracker = EventTracker::new();
        tracker.on_cache_event(&CacheEvent::Removed { key: key("a") });
        tracker.on_cache_event(&CacheEvent::Other);
        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let tracker = EventTracker::new();
        for _ in 0..3 {
            tracker.on_cache_event(&CacheEvent::Added {
                key: key("a"),
                status: EntryStatus::Pending,
            });
        }
        assert_eq!(tracker.tracked_count(), 1);
    }

    #[test]
    fn test_drain_takes_and_clears() {
        let tracker = EventTracker::new();
        tracker.on_cache_event(&CacheEvent::Added {
            key: key("a"),
            status: EntryStatus::Success,
        });

        let drained = tracker.drain();
        assert_eq!(drained.len(), 1);
        assert!(drained.contains(&key("a")));
        assert_eq!(tracker.tracked_count(), 0);

        // A second drain with no intervening events yields nothing.
        assert!(tracker.drain().is_empty());
    }
}
