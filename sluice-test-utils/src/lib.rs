//! Sluice Test Utilities
//!
//! In-memory implementations of the bridge's external collaborators:
//! - [`InMemoryCache`]: a query cache with a change-event feed, readable on
//!   the producer side and writable on the consumer side
//! - [`InMemoryTransport`]: an ordered chunk stream with explicit flush and
//!   delivery steps, so tests control the streaming cadence
//!
//! These model the collaborator contracts; they are test infrastructure,
//! not production cache or transport implementations.

mod cache;
mod transport;

pub use cache::InMemoryCache;
pub use transport::InMemoryTransport;

// Re-export the types tests touch most, for convenience
pub use sluice_core::{
    CacheEvent, Chunk, CumulativeSnapshot, DehydratedEntry, EntryKey, EntryStatus, MutationRecord,
};
