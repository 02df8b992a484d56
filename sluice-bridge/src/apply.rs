//! Applying a cumulative snapshot to the consumer's local cache.

use crate::traits::CacheWriter;
use sluice_core::{CacheError, CumulativeSnapshot, SluiceResult};
use tracing::warn;

/// Write a full cumulative snapshot into the consumer cache.
///
/// Entries and mutation records are upserted in snapshot order, so a later
/// occurrence of a key overwrites an earlier one, and applying the same
/// snapshot twice leaves the cache in the same state as applying it once.
///
/// A failed upsert does not stop the pass: the failure is logged, the
/// remaining items are still applied, and the first failure is returned so
/// the caller can surface it.
pub fn apply_snapshot<P: Clone, C: CacheWriter<P> + ?Sized>(
    cache: &C,
    snapshot: &CumulativeSnapshot<P>,
) -> SluiceResult<()> {
    let mut first_failure: Option<CacheError> = None;

    for entry in &snapshot.entries {
        if let Err(err) = cache.upsert_entry(entry.clone()) {
            warn!(key = %entry.key, error = %err, "entry upsert failed");
            first_failure.get_or_insert(err);
        }
    }
    for record in &snapshot.mutations {
        if let Err(err) = cache.upsert_mutation(record.clone()) {
            warn!(key = %record.key, error = %err, "mutation upsert failed");
            first_failure.get_or_insert(err);
        }
    }

    match first_failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
