//! Flush-boundary chunk encoding.

use crate::filter::EligibilityFilter;
use crate::tracker::EventTracker;
use crate::traits::CacheReader;
use sluice_core::{Chunk, PassId};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Drains the tracked set at each flush boundary and encodes the eligible
/// entries into one [`Chunk`].
///
/// Flush boundaries are driven by the surrounding output stream and are
/// totally ordered; the encoder never triggers its own boundary and never
/// overlaps two boundaries. That sequencing is the single concurrency
/// invariant that keeps tracked-set access race-free.
pub struct FlushEncoder<P, C> {
    cache: Arc<C>,
    tracker: Arc<EventTracker>,
    filter: EligibilityFilter,
    pass_id: PassId,
    _payload: PhantomData<fn() -> P>,
}

impl<P, C: CacheReader<P>> FlushEncoder<P, C> {
    pub fn new(
        cache: Arc<C>,
        tracker: Arc<EventTracker>,
        filter: EligibilityFilter,
        pass_id: PassId,
    ) -> Self {
        Self {
            cache,
            tracker,
            filter,
            pass_id,
            _payload: PhantomData,
        }
    }

    pub fn pass_id(&self) -> PassId {
        self.pass_id
    }

    /// Encode one chunk for the current boundary, or `None` when there is
    /// nothing eligible (an empty chunk is suppressed, never transmitted).
    ///
    /// The tracked set is cleared unconditionally, whether or not anything
    /// was retained: stale keys must never leak into the next boundary.
    /// Entries that stayed pending are dropped from tracking too; they
    /// re-enter only via a fresh change event.
    pub fn on_flush_boundary(&self) -> Option<Chunk<P>> {
        let tracked = self.tracker.drain();
        if tracked.is_empty() {
            return None;
        }

        // Stable emission order for logs and tests; order inside a chunk
        // carries no meaning.
        let mut keys: Vec<_> = tracked.iter().cloned().collect();
        keys.sort();

        let mut entries = Vec::new();
        let mut deferred = 0usize;
        for key in &keys {
            // An entry removed after tracking has nothing to serialize.
            let Some(entry) = self.cache.dehydrated_entry(key) else {
                continue;
            };
            if self.filter.is_eligible(&tracked, &entry.key, entry.status) {
                entries.push(entry);
            } else {
                deferred += 1;
            }
        }

        if entries.is_empty() {
            debug!(
                pass = %self.pass_id,
                deferred,
                "flush boundary produced no eligible entries"
            );
            return None;
        }

        let mutations = self.cache.outstanding_mutations();
        debug!(
            pass = %self.pass_id,
            emitted = entries.len(),
            deferred,
            mutations = mutations.len(),
            "emitting chunk"
        );
        Some(Chunk::new(entries, mutations))
    }
}
