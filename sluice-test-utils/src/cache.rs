//! In-memory cache collaborator.

use chrono::Utc;
use sluice_core::traits::{CacheEvents, CacheObserver, CacheReader, CacheWriter, Subscription};
use sluice_core::{CacheError, CacheEvent, DehydratedEntry, EntryKey, EntryStatus, MutationRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type ObserverList = Vec<(u64, Arc<dyn CacheObserver>)>;

/// An in-memory query cache implementing all three cache collaborator
/// traits.
///
/// Producer-side mutations (`upsert_with_status`, `remove`) feed the
/// change-event observers. Consumer-side writes through [`CacheWriter`] are
/// silent: hydration writes model reconstructing state, not fetch activity,
/// and must not re-enter the event feed.
pub struct InMemoryCache<P> {
    entries: Mutex<BTreeMap<EntryKey, DehydratedEntry<P>>>,
    mutations: Mutex<BTreeMap<EntryKey, MutationRecord<P>>>,
    observers: Arc<Mutex<ObserverList>>,
    next_observer_id: AtomicU64,
    read_only: AtomicBool,
}

impl<P> Default for InMemoryCache<P> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            mutations: Mutex::new(BTreeMap::new()),
            observers: Arc::new(Mutex::new(Vec::new())),
            next_observer_id: AtomicU64::new(0),
            read_only: AtomicBool::new(false),
        }
    }
}

impl<P> InMemoryCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every [`CacheWriter`] upsert fail, for apply-error tests.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self, event: CacheEvent) {
        // Snapshot the observer list so callbacks run without the lock.
        let observers: Vec<Arc<dyn CacheObserver>> = lock(&self.observers)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer.on_cache_event(&event);
        }
    }
}

impl<P: Clone> InMemoryCache<P> {
    /// Insert or update an entry, emitting `Added` or `Updated` on the
    /// change feed.
    pub fn upsert_with_status(&self, key: EntryKey, value: P, status: EntryStatus) {
        let entry = DehydratedEntry::new(key.clone(), value, status, Utc::now());
        let replaced = lock(&self.entries).insert(key.clone(), entry).is_some();
        let event = if replaced {
            CacheEvent::Updated { key, status }
        } else {
            CacheEvent::Added { key, status }
        };
        self.notify(event);
    }

    /// Remove an entry, emitting `Removed` if it was present.
    pub fn remove(&self, key: &EntryKey) {
        let removed = lock(&self.entries).remove(key).is_some();
        if removed {
            self.notify(CacheEvent::Removed { key: key.clone() });
        }
    }

    /// Record an outstanding mutation, visible to the flush encoder via
    /// [`CacheReader::outstanding_mutations`].
    pub fn record_outstanding_mutation(&self, key: EntryKey, value: P, status: EntryStatus) {
        let record = MutationRecord::new(key.clone(), value, status, Utc::now());
        lock(&self.mutations).insert(key, record);
    }

    pub fn entry(&self, key: &EntryKey) -> Option<DehydratedEntry<P>> {
        lock(&self.entries).get(key).cloned()
    }

    pub fn mutation(&self, key: &EntryKey) -> Option<MutationRecord<P>> {
        lock(&self.mutations).get(key).cloned()
    }

    /// All entries, in key order.
    pub fn entries(&self) -> Vec<DehydratedEntry<P>> {
        lock(&self.entries).values().cloned().collect()
    }
}

impl<P: Clone> CacheReader<P> for InMemoryCache<P> {
    fn dehydrated_entry(&self, key: &EntryKey) -> Option<DehydratedEntry<P>> {
        self.entry(key)
    }

    fn outstanding_mutations(&self) -> Vec<MutationRecord<P>> {
        lock(&self.mutations).values().cloned().collect()
    }
}

impl<P: Clone> CacheWriter<P> for InMemoryCache<P> {
    fn upsert_entry(&self, entry: DehydratedEntry<P>) -> Result<(), CacheError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CacheError::ApplyFailed {
                key: entry.key,
                reason: "cache is read-only".to_string(),
            });
        }
        lock(&self.entries).insert(entry.key.clone(), entry);
        Ok(())
    }

    fn upsert_mutation(&self, record: MutationRecord<P>) -> Result<(), CacheError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CacheError::ApplyFailed {
                key: record.key,
                reason: "cache is read-only".to_string(),
            });
        }
        lock(&self.mutations).insert(record.key.clone(), record);
        Ok(())
    }
}

impl<P> CacheEvents for InMemoryCache<P> {
    fn subscribe(&self, observer: Arc<dyn CacheObserver>) -> Subscription {
        let id = self.next_observer_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.observers).push((id, observer));

        let observers: Weak<Mutex<ObserverList>> = Arc::downgrade(&self.observers);
        Subscription::new(move || {
            if let Some(observers) = observers.upgrade() {
                lock(&observers).retain(|(observer_id, _)| *observer_id != id);
            }
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
