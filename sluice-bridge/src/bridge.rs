//! Bridge construction and role wiring.
//!
//! One bridge instance serves exactly one role. The role is a capability
//! flag supplied at construction, not a runtime environment check: the
//! producer half subscribes to the cache feed and registers the flush hook,
//! the consumer half registers the entries hook. There is no shared mutable
//! state between the halves other than the one-way chunk stream.

use crate::apply::apply_snapshot;
use crate::filter::EligibilityFilter;
use crate::flush::FlushEncoder;
use crate::merge::MergeReducer;
use crate::tracker::EventTracker;
use crate::traits::{CacheEvents, CacheReader, CacheWriter, Subscription};
use crate::transport::StreamTransport;
use sluice_core::{new_pass_id, PassId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which half of the pipeline this bridge instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeRole {
    /// Observes cache mutations and emits chunks at flush boundaries.
    Producer,
    /// Merges arriving chunks and applies them to the local cache.
    Consumer,
}

/// Producer half: event tracking wired to the transport's flush hook.
///
/// The cache subscription is owned by this handle and released on
/// [`ProducerBridge::dispose`] or drop, when the render pass ends. Any
/// tracked-but-unflushed entries at that point are simply discarded; that
/// is an accepted data-loss boundary, not a failure.
#[derive(Debug)]
pub struct ProducerBridge {
    subscription: Subscription,
    pass_id: PassId,
}

impl ProducerBridge {
    /// Wire a producer bridge with the default eligibility filter
    /// (settled entries only).
    pub fn new<P, C, T>(cache: Arc<C>, transport: &T) -> Self
    where
        P: Send + 'static,
        C: CacheReader<P> + CacheEvents + Send + Sync + 'static,
        T: StreamTransport<P> + ?Sized,
    {
        Self::with_filter(cache, transport, EligibilityFilter::settled_only())
    }

    /// Wire a producer bridge with a caller-supplied eligibility filter.
    pub fn with_filter<P, C, T>(cache: Arc<C>, transport: &T, filter: EligibilityFilter) -> Self
    where
        P: Send + 'static,
        C: CacheReader<P> + CacheEvents + Send + Sync + 'static,
        T: StreamTransport<P> + ?Sized,
    {
        let pass_id = new_pass_id();
        let tracker = Arc::new(EventTracker::new());

        // Subscription happens once, here, and only for the producer role;
        // the consumer has no flush boundary to feed.
        let subscription = cache.subscribe(tracker.clone());

        let encoder = FlushEncoder::new(cache, tracker, filter, pass_id);
        transport.register_flush_producer(Box::new(move || {
            // An empty flush returns an empty sequence, never a sequence
            // containing an empty chunk.
            encoder.on_flush_boundary().into_iter().collect()
        }));

        debug!(pass = %pass_id, "producer bridge wired");
        Self {
            subscription,
            pass_id,
        }
    }

    pub fn pass_id(&self) -> PassId {
        self.pass_id
    }

    /// Release the cache subscription. Equivalent to dropping the bridge.
    pub fn dispose(self) {
        self.subscription.dispose();
    }
}

/// Consumer half: merge-and-apply wired to the transport's entries hook.
///
/// The bridge owns a session-active flag. After [`ConsumerBridge::shutdown`]
/// (or drop), chunks that still arrive are dropped silently; late arrival
/// after teardown is a no-op, never a crash.
#[derive(Debug)]
pub struct ConsumerBridge {
    active: Arc<AtomicBool>,
    pass_id: PassId,
}

impl ConsumerBridge {
    pub fn new<P, C, T>(cache: Arc<C>, transport: &T) -> Self
    where
        P: Clone + Send + 'static,
        C: CacheWriter<P> + Send + Sync + 'static,
        T: StreamTransport<P> + ?Sized,
    {
        let pass_id = new_pass_id();
        let active = Arc::new(AtomicBool::new(true));
        let guard = active.clone();
        let mut reducer = MergeReducer::new();

        transport.register_entries_consumer(Box::new(move |chunks| {
            if !guard.load(Ordering::SeqCst) {
                debug!(pass = %pass_id, dropped = chunks.len(), "chunks after teardown ignored");
                return;
            }
            // Always apply the full cumulative snapshot, not the delta, so
            // repeated application stays idempotent.
            let snapshot = reducer.on_entries(chunks);
            if let Err(err) = apply_snapshot(cache.as_ref(), snapshot) {
                warn!(pass = %pass_id, error = %err, "snapshot application failed");
            }
        }));

        debug!(pass = %pass_id, "consumer bridge wired");
        Self { active, pass_id }
    }

    pub fn pass_id(&self) -> PassId {
        self.pass_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// End the session. Subsequent chunk arrivals become no-ops.
    pub fn shutdown(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for ConsumerBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A bridge in either role.
///
/// [`HydrationBridge::new`] is the single factory for callers whose cache
/// type implements both sides; the role-specific constructors on
/// [`ProducerBridge`] and [`ConsumerBridge`] carry narrower bounds.
#[derive(Debug)]
pub enum HydrationBridge {
    Producer(ProducerBridge),
    Consumer(ConsumerBridge),
}

impl HydrationBridge {
    pub fn new<P, C, T>(role: BridgeRole, cache: Arc<C>, transport: &T) -> Self
    where
        P: Clone + Send + 'static,
        C: CacheReader<P> + CacheWriter<P> + CacheEvents + Send + Sync + 'static,
        T: StreamTransport<P> + ?Sized,
    {
        Self::with_filter(role, cache, transport, EligibilityFilter::settled_only())
    }

    pub fn with_filter<P, C, T>(
        role: BridgeRole,
        cache: Arc<C>,
        transport: &T,
        filter: EligibilityFilter,
    ) -> Self
    where
        P: Clone + Send + 'static,
        C: CacheReader<P> + CacheWriter<P> + CacheEvents + Send + Sync + 'static,
        T: StreamTransport<P> + ?Sized,
    {
        match role {
            BridgeRole::Producer => {
                Self::Producer(ProducerBridge::with_filter(cache, transport, filter))
            }
            BridgeRole::Consumer => Self::Consumer(ConsumerBridge::new(cache, transport)),
        }
    }

    pub fn role(&self) -> BridgeRole {
        match self {
            Self::Producer(_) => BridgeRole::Producer,
            Self::Consumer(_) => BridgeRole::Consumer,
        }
    }

    pub fn pass_id(&self) -> PassId {
        match self {
            Self::Producer(bridge) => bridge.pass_id(),
            Self::Consumer(bridge) => bridge.pass_id(),
        }
    }
}
