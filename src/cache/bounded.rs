//! Shared, internally synchronized handle to the pod store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::cache::{CacheStats, CacheStore};
use crate::error::Result;
use crate::models::{PodKey, PodRecord};

/// Cloneable handle to a [`CacheStore`] guarded by a mutex.
///
/// Every operation holds the lock only for the in-memory update, never
/// across I/O, so it is safe to call from async tasks and plain threads.
#[derive(Debug, Clone)]
pub struct BoundedCache {
    store: Arc<Mutex<CacheStore>>,
}

impl BoundedCache {
    /// Creates a cache holding at most `max_entries` records.
    pub fn new(max_entries: usize) -> Result<Self> {
        let store = CacheStore::new(max_entries)?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
        })
    }

    // == Lookups ==
    /// Returns the record for `key` and marks it as recently used.
    pub fn get(&self, key: &PodKey) -> Option<Arc<PodRecord>> {
        self.lock().get(key)
    }

    /// Returns the record for `key` without touching recency or stats.
    pub fn peek(&self, key: &PodKey) -> Option<Arc<PodRecord>> {
        self.lock().peek(key)
    }

    // == Writes ==
    /// Inserts or overwrites `key`, evicting the least recently used entry
    /// when the cache is full.
    pub fn add(&self, key: PodKey, record: Arc<PodRecord>) {
        if let Some(evicted) = self.lock().add(key, record) {
            trace!(%evicted, "Evicted least recently used pod");
        }
    }

    /// Inserts `record` only if `key` is absent. An existing entry is neither
    /// overwritten nor touched. Returns whether the record was inserted.
    pub fn contains_or_add(&self, key: PodKey, record: Arc<PodRecord>) -> bool {
        self.lock().contains_or_add(key, record)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &PodKey) -> bool {
        self.lock().remove(key)
    }

    // == Introspection ==
    /// Cached keys, most recently used first.
    pub fn keys(&self) -> Vec<PodKey> {
        self.lock().keys()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // Store operations leave the LRU consistent even on panic.
    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
