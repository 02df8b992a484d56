//! Change-event vocabulary of the cache collaborator, plus pass identity.

use crate::entry::{EntryKey, EntryStatus};
use uuid::Uuid;

/// Identifier for one producer render pass / one consumer session.
/// UUIDv7 embeds a Unix timestamp, making pass IDs sortable by creation time.
pub type PassId = Uuid;

/// Generate a new UUIDv7 PassId (timestamp-sortable).
pub fn new_pass_id() -> PassId {
    Uuid::now_v7()
}

/// One event from the cache's change feed.
///
/// Only `Added` and `Updated` drive tracking. `Removed` is deliberately
/// ignored by the bridge: a removed entry simply never appears in a
/// subsequent flush, so removal needs no propagation of its own. `Other`
/// covers feed events outside the bridge's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Added { key: EntryKey, status: EntryStatus },
    Updated { key: EntryKey, status: EntryStatus },
    Removed { key: EntryKey },
    Other,
}

impl CacheEvent {
    /// The affected entry key, if the event names one.
    pub fn key(&self) -> Option<&EntryKey> {
        match self {
            CacheEvent::Added { key, .. }
            | CacheEvent::Updated { key, .. }
            | CacheEvent::Removed { key } => Some(key),
            CacheEvent::Other => None,
        }
    }

    /// Short tag for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheEvent::Added { .. } => "added",
            CacheEvent::Updated { .. } => "updated",
            CacheEvent::Removed { .. } => "removed",
            CacheEvent::Other => "other",
        }
    }
}
