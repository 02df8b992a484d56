//! Dehydration eligibility.

use sluice_core::{EntryKey, EntryStatus};
use std::collections::HashSet;

/// Decides which tracked entries are safe to serialize at a flush boundary.
///
/// An entry is eligible iff its key is in the tracked set AND its status
/// passes the settled predicate. The default predicate admits everything
/// except `Pending`: transmitting a pending entry would ship a value the
/// consumer cannot trust as final. A pending entry is deferred to the next
/// flush; if it never settles before the pass ends it is never transmitted,
/// which is accepted, bounded information loss rather than an error.
pub struct EligibilityFilter {
    settled: Box<dyn Fn(EntryStatus) -> bool + Send + Sync>,
}

impl EligibilityFilter {
    /// The default filter: any status other than `Pending` is transmittable.
    pub fn settled_only() -> Self {
        Self {
            settled: Box::new(|status| status.is_settled()),
        }
    }

    /// A filter with a caller-supplied status predicate. The tracked-set
    /// half of the check is not negotiable.
    pub fn with_predicate(predicate: impl Fn(EntryStatus) -> bool + Send + Sync + 'static) -> Self {
        Self {
            settled: Box::new(predicate),
        }
    }

    pub fn is_eligible(
        &self,
        tracked: &HashSet<EntryKey>,
        key: &EntryKey,
        status: EntryStatus,
    ) -> bool {
        tracked.contains(key) && (self.settled)(status)
    }
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::settled_only()
    }
}

impl std::fmt::Debug for EligibilityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityFilter").finish_non_exhaustive()
    }
}
