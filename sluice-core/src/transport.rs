//! The consumed stream-transport interface.
//!
//! The transport is a one-way, ordered, append-only channel from producer
//! to consumer, driven by the producer's natural output-flush cadence. The
//! bridge needs exactly two capabilities from it: a producer-side hook
//! invoked at each flush boundary, and a consumer-side hook invoked when
//! chunks arrive. Everything else about the transport (framing, encoding,
//! the medium itself) stays with the collaborator; `sluice-bridge` offers a
//! chunk codec to transports that carry text frames.

use crate::chunk::Chunk;

/// Producer-side hook. Called once per flush boundary; the returned chunks
/// (possibly none) are appended to the outgoing stream in call order.
pub type FlushProducer<P> = Box<dyn FnMut() -> Vec<Chunk<P>> + Send>;

/// Consumer-side hook. Called whenever one or more chunks have arrived,
/// with only the newly arrived chunks, in emission order. The transport
/// guarantees no reordering, no duplication, and no redelivery.
pub type EntriesConsumer<P> = Box<dyn FnMut(Vec<Chunk<P>>) + Send>;

/// One-way ordered chunk stream between the two bridge halves.
pub trait StreamTransport<P> {
    fn register_flush_producer(&self, producer: FlushProducer<P>);

    fn register_entries_consumer(&self, consumer: EntriesConsumer<P>);
}
