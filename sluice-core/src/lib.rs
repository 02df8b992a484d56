//! Sluice Core - Data Types and Collaborator Contracts
//!
//! Data structures and collaborator traits for the streaming hydration
//! bridge. All other crates depend on this. This crate contains no
//! tracking, flushing, or merging logic; that lives in `sluice-bridge`.
//!
//! # Key Types
//!
//! - `EntryKey`: stable, deterministic cache-entry key (SHA-256 of identity)
//! - `EntryStatus`: pending / success / error lifecycle of a cache entry
//! - `DehydratedEntry<P>` / `MutationRecord<P>`: one serialized cache item
//! - `Chunk<P>`: one unit of transmitted state, produced per flush boundary
//! - `CumulativeSnapshot<P>`: consumer-side accumulator over all chunks
//! - `CacheEvent`: change-event feed vocabulary of the cache collaborator
//! - `SluiceError` / `SluiceResult`: error taxonomy for the bridge
//! - [`traits`] / [`transport`]: the contracts the external cache and
//!   stream collaborators are consumed through

mod chunk;
mod entry;
mod error;
mod event;
pub mod traits;
pub mod transport;

pub use chunk::{Chunk, CumulativeSnapshot};
pub use entry::{DehydratedEntry, EntryKey, EntryStatus, MutationRecord, Timestamp};
pub use error::{CacheError, SluiceError, SluiceResult, TransportError};
pub use event::{new_pass_id, CacheEvent, PassId};
