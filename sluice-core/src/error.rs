//! Error types for Sluice operations.

use crate::entry::EntryKey;
use thiserror::Error;

/// Transport layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Malformed chunk: {reason}")]
    MalformedChunk { reason: String },

    #[error("Chunk encoding failed: {reason}")]
    EncodeFailed { reason: String },
}

/// Cache collaborator errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Upsert failed for entry {key}: {reason}")]
    ApplyFailed { key: EntryKey, reason: String },
}

/// Master error type for all Sluice errors.
///
/// Note what is NOT in here: a pending entry at flush time and a flush with
/// no eligible entries are ordinary outcomes (deferred / suppressed), and a
/// chunk arriving after consumer teardown is a guarded no-op. Only
/// genuinely unexpected collaborator behavior surfaces as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SluiceError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result type alias for Sluice operations.
pub type SluiceResult<T> = Result<T, SluiceError>;
