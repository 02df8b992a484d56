//! Sluice Bridge - Streaming Hydration
//!
//! The bridge transports pieces of producer-computed cache state to a
//! consumer runtime while output is still streaming, so the consumer can
//! reconstruct an equivalent in-memory cache without waiting for the whole
//! response.
//!
//! # Architecture
//!
//! ```text
//! cache mutation -> EventTracker -> (flush boundary) -> FlushEncoder
//!     -> StreamTransport -> MergeReducer -> apply_snapshot -> local cache
//! ```
//!
//! The producer side observes the cache's change feed and, at each flush
//! boundary of the surrounding output stream, drains the tracked set and
//! emits the settled entries as one [`Chunk`]. The consumer side folds every
//! received chunk into a [`CumulativeSnapshot`] and applies the whole
//! snapshot idempotently.
//!
//! The concrete cache and transport are external collaborators, consumed
//! through the traits in [`traits`] and [`transport`]. Both sides are
//! single-threaded and event-driven: every callback is a synchronous
//! transformation invoked by the surrounding runtime, and flush boundaries
//! never overlap.

mod apply;
mod bridge;
mod codec;
mod filter;
mod flush;
mod merge;
mod tracker;

pub use apply::apply_snapshot;
pub use bridge::{BridgeRole, ConsumerBridge, HydrationBridge, ProducerBridge};
pub use codec::{decode_chunk, decode_frames, encode_chunk};
pub use filter::EligibilityFilter;
pub use flush::FlushEncoder;
pub use merge::MergeReducer;
pub use tracker::EventTracker;

// The collaborator contracts live in sluice-core; re-exported here so
// bridge users wire everything through one crate.
pub use sluice_core::traits::{CacheEvents, CacheObserver, CacheReader, CacheWriter, Subscription};
pub use sluice_core::transport::{EntriesConsumer, FlushProducer, StreamTransport};
pub use sluice_core::{traits, transport};

// Re-export core types for convenience
pub use sluice_core::{
    CacheError, CacheEvent, Chunk, CumulativeSnapshot, DehydratedEntry, EntryKey, EntryStatus,
    MutationRecord, PassId, SluiceError, SluiceResult, Timestamp, TransportError, new_pass_id,
};
