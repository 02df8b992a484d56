//! In-memory stream transport.

use sluice_core::transport::{EntriesConsumer, FlushProducer, StreamTransport};
use sluice_core::Chunk;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

struct Hooks<P> {
    producer: Option<FlushProducer<P>>,
    consumer: Option<EntriesConsumer<P>>,
}

/// An ordered, append-only chunk stream with explicit flush and delivery
/// steps, so tests drive the streaming cadence themselves.
///
/// `flush()` invokes the producer hook and queues whatever it returns;
/// `deliver()` hands every queued chunk to the consumer hook in emission
/// order, exactly once. Keeping the two steps separate lets tests hold
/// chunks in flight (e.g. to deliver them only after consumer teardown).
pub struct InMemoryTransport<P> {
    hooks: Mutex<Hooks<P>>,
    in_flight: Mutex<Vec<Chunk<P>>>,
    emitted: AtomicUsize,
    delivered: AtomicUsize,
}

impl<P> Default for InMemoryTransport<P> {
    fn default() -> Self {
        Self {
            hooks: Mutex::new(Hooks {
                producer: None,
                consumer: None,
            }),
            in_flight: Mutex::new(Vec::new()),
            emitted: AtomicUsize::new(0),
            delivered: AtomicUsize::new(0),
        }
    }
}

impl<P> InMemoryTransport<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive one flush boundary. Returns how many chunks the producer hook
    /// emitted for this boundary.
    pub fn flush(&self) -> usize {
        // Take the hook out so it runs without the transport lock held.
        let Some(mut producer) = lock(&self.hooks).producer.take() else {
            return 0;
        };
        let chunks = producer();
        lock(&self.hooks).producer = Some(producer);

        let count = chunks.len();
        self.emitted.fetch_add(count, Ordering::SeqCst);
        lock(&self.in_flight).extend(chunks);
        count
    }

    /// Deliver everything currently in flight to the consumer hook, in
    /// emission order. The hook is only invoked when at least one chunk has
    /// arrived. Returns how many chunks were delivered.
    pub fn deliver(&self) -> usize {
        let Some(mut consumer) = lock(&self.hooks).consumer.take() else {
            return 0;
        };
        let chunks: Vec<Chunk<P>> = std::mem::take(&mut *lock(&self.in_flight));
        let count = chunks.len();
        if count > 0 {
            consumer(chunks);
            self.delivered.fetch_add(count, Ordering::SeqCst);
        }
        lock(&self.hooks).consumer = Some(consumer);
        count
    }

    /// One full cadence step: flush, then deliver. Returns the number of
    /// chunks delivered.
    pub fn flush_and_deliver(&self) -> usize {
        self.flush();
        self.deliver()
    }

    /// Chunks emitted over the life of the stream.
    pub fn emitted_chunks(&self) -> usize {
        self.emitted.load(Ordering::SeqCst)
    }

    /// Chunks delivered over the life of the stream.
    pub fn delivered_chunks(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Chunks emitted but not yet delivered.
    pub fn in_flight_chunks(&self) -> usize {
        lock(&self.in_flight).len()
    }
}

impl<P> StreamTransport<P> for InMemoryTransport<P> {
    fn register_flush_producer(&self, producer: FlushProducer<P>) {
        lock(&self.hooks).producer = Some(producer);
    }

    fn register_entries_consumer(&self, consumer: EntriesConsumer<P>) {
        lock(&self.hooks).consumer = Some(consumer);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
