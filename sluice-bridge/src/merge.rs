//! Consumer-side chunk merging.

use sluice_core::{Chunk, CumulativeSnapshot};
use tracing::debug;

/// Folds every received chunk batch into one cumulative snapshot.
///
/// The reducer concatenates; it never deduplicates by key. Because the
/// applier upserts entries in snapshot order, the occurrence from the
/// latest chunk wins, and handing the applier the full snapshot (rather
/// than just the new delta) keeps re-application idempotent.
#[derive(Debug)]
pub struct MergeReducer<P> {
    snapshot: CumulativeSnapshot<P>,
}

impl<P> Default for MergeReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> MergeReducer<P> {
    pub fn new() -> Self {
        Self {
            snapshot: CumulativeSnapshot::new(),
        }
    }

    /// Absorb a batch of newly arrived chunks, in arrival order, and return
    /// the full cumulative snapshot.
    pub fn on_entries(&mut self, chunks: Vec<Chunk<P>>) -> &CumulativeSnapshot<P> {
        let entries: usize = chunks.iter().map(|c| c.entries.len()).sum();
        debug!(chunks = chunks.len(), entries, "received chunk batch");
        for chunk in chunks {
            self.snapshot.absorb(chunk);
        }
        &self.snapshot
    }

    pub fn snapshot(&self) -> &CumulativeSnapshot<P> {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sluice_core::{DehydratedEntry, EntryKey, EntryStatus};

    fn entry(name: &str, value: i64) -> DehydratedEntry<i64> {
        DehydratedEntry::new(
            EntryKey::from_identity(name.as_bytes()),
            value,
            EntryStatus::Success,
            Utc::now(),
        )
    }

    #[test]
    fn test_batches_accumulate_across_calls() {
        let mut reducer = MergeReducer::new();
        reducer.on_entries(vec![Chunk::new(vec![entry("a", 1)], vec![])]);
        let snapshot = reducer.on_entries(vec![
            Chunk::new(vec![entry("b", 2)], vec![]),
            Chunk::new(vec![entry("c", 3)], vec![]),
        ]);
        assert_eq!(snapshot.entry_count(), 3);
    }

    #[test]
    fn test_empty_batch_leaves_snapshot_unchanged() {
        let mut reducer = MergeReducer::new();
        reducer.on_entries(vec![Chunk::new(vec![entry("a", 1)], vec![])]);
        let snapshot = reducer.on_entries(vec![]);
        assert_eq!(snapshot.entry_count(), 1);
    }

    #[test]
    fn test_later_chunk_occurrence_comes_last() {
        let mut reducer = MergeReducer::new();
        reducer.on_entries(vec![Chunk::new(vec![entry("a", 1)], vec![])]);
        reducer.on_entries(vec![Chunk::new(vec![entry("a", 2)], vec![])]);

        let key_a = EntryKey::from_identity(b"a");
        let values: Vec<i64> = reducer
            .snapshot()
            .entries
            .iter()
            .filter(|e| e.key == key_a)
            .map(|e| e.value)
            .collect();
        assert_eq!(values, vec![1, 2]);
    }
}
