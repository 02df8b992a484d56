//! Chunks and the consumer-side cumulative snapshot.

use crate::entry::{DehydratedEntry, EntryKey, MutationRecord};
use serde::{Deserialize, Serialize};

/// One unit of transmitted state, corresponding to one flush boundary.
///
/// A chunk is immutable once produced. Order of entries within a chunk is
/// irrelevant; chunks with no entries are never transmitted (the flush
/// encoder suppresses them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk<P> {
    pub entries: Vec<DehydratedEntry<P>>,
    pub mutations: Vec<MutationRecord<P>>,
}

impl<P> Chunk<P> {
    pub fn new(entries: Vec<DehydratedEntry<P>>, mutations: Vec<MutationRecord<P>>) -> Self {
        Self { entries, mutations }
    }

    /// True when the chunk carries no entries. Suppression is keyed on
    /// entries: outstanding mutations are re-read at the next flush, so a
    /// mutations-only chunk carries nothing that would be lost.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of the entries in this chunk, in chunk order.
    pub fn entry_keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.entries.iter().map(|e| &e.key)
    }
}

/// Consumer-side accumulator over every chunk received in one session.
///
/// Chunks are absorbed by concatenation: the snapshot keeps duplicates by
/// key rather than deduplicating. This is deliberate - application upserts
/// entries in snapshot order, so the occurrence from the latest chunk wins
/// (last-write-wins by arrival order) and re-applying the whole snapshot is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSnapshot<P> {
    pub entries: Vec<DehydratedEntry<P>>,
    pub mutations: Vec<MutationRecord<P>>,
}

impl<P> CumulativeSnapshot<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            mutations: Vec::new(),
        }
    }

    /// Append a chunk's entries and mutations, preserving arrival order.
    pub fn absorb(&mut self, chunk: Chunk<P>) {
        self.entries.extend(chunk.entries);
        self.mutations.extend(chunk.mutations);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.mutations.is_empty()
    }

    /// Total entry occurrences absorbed so far (counting duplicates).
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl<P> Default for CumulativeSnapshot<P> {
    fn default() -> Self {
        Self::new()
    }
}
