//! Cache entry identity, status, and serialized entry shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Stable, deterministic identifier for one cache entry.
///
/// Keys are derived by hashing the entry's logical identity (e.g. the
/// serialized query descriptor) with SHA-256 and hex-encoding the digest.
/// Two caches that hold the same logical entry therefore agree on its key
/// without any coordination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    /// Derive a key from an entry's logical identity.
    pub fn from_identity(identity: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identity);
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap a key that was already derived elsewhere (e.g. by the cache
    /// collaborator, which owns the hashing of its own entry descriptors).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The hex-encoded key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a cache entry.
///
/// Only settled entries (not `Pending`) are safe to transmit: a pending
/// value is one the consumer cannot trust as final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// The entry's value is still being produced.
    Pending,
    /// The entry settled with a usable value.
    Success,
    /// The entry settled with an error outcome.
    Error,
}

impl EntryStatus {
    /// True for any status other than `Pending`.
    pub fn is_settled(&self) -> bool {
        !matches!(self, EntryStatus::Pending)
    }
}

/// One serialized cache entry as it travels over the wire.
///
/// `updated_at` is carried from the source cache state for diagnostics; it
/// plays no part in conflict resolution (arrival order decides that).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DehydratedEntry<P> {
    pub key: EntryKey,
    pub value: P,
    pub status: EntryStatus,
    pub updated_at: Timestamp,
}

impl<P> DehydratedEntry<P> {
    pub fn new(key: EntryKey, value: P, status: EntryStatus, updated_at: Timestamp) -> Self {
        Self {
            key,
            value,
            status,
            updated_at,
        }
    }
}

/// One outstanding mutation record, same wire shape as an entry.
///
/// Mutation records ride alongside entries in every chunk and are upserted
/// on apply; they are not gated by eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord<P> {
    pub key: EntryKey,
    pub value: P,
    pub status: EntryStatus,
    pub updated_at: Timestamp,
}

impl<P> MutationRecord<P> {
    pub fn new(key: EntryKey, value: P, status: EntryStatus, updated_at: Timestamp) -> Self {
        Self {
            key,
            value,
            status,
            updated_at,
        }
    }
}
