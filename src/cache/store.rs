//! Cache Store Module
//!
//! LRU storage of pod records keyed by `PodKey`, with activity statistics.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::cache::CacheStats;
use crate::error::{Result, TrackerError};
use crate::models::{PodKey, PodRecord};

// == Cache Store ==
/// Fixed-capacity pod store with least-recently-used eviction.
///
/// Not synchronized; see [`BoundedCache`](crate::cache::BoundedCache) for the
/// shared handle.
#[derive(Debug)]
pub struct CacheStore {
    /// Records ordered from most to least recently used
    entries: LruCache<PodKey, Arc<PodRecord>>,
    /// Activity statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` records.
    ///
    /// A capacity of zero is a configuration error.
    pub fn new(max_entries: usize) -> Result<Self> {
        let capacity =
            NonZeroUsize::new(max_entries).ok_or(TrackerError::InvalidCapacity(max_entries))?;

        Ok(Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::new(),
        })
    }

    // == Get ==
    /// Returns the record for `key` and marks it as most recently used.
    pub fn get(&mut self, key: &PodKey) -> Option<Arc<PodRecord>> {
        match self.entries.get(key) {
            Some(record) => {
                self.stats.record_hit();
                Some(Arc::clone(record))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the record for `key` without touching recency or stats.
    pub fn peek(&self, key: &PodKey) -> Option<Arc<PodRecord>> {
        self.entries.peek(key).cloned()
    }

    // == Add ==
    /// Inserts or overwrites the record for `key` and marks it most recent.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn add(&mut self, key: PodKey, record: Arc<PodRecord>) -> Option<PodKey> {
        let evicted = match self.entries.push(key.clone(), record) {
            Some((old_key, _)) if old_key != key => {
                self.stats.record_eviction();
                Some(old_key)
            }
            _ => None,
        };

        self.stats.record_insert();
        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Contains Or Add ==
    /// Inserts the record only if `key` is absent.
    ///
    /// An existing entry is neither overwritten nor touched. Returns true
    /// when the record was inserted.
    pub fn contains_or_add(&mut self, key: PodKey, record: Arc<PodRecord>) -> bool {
        if self.entries.contains(&key) {
            self.stats.record_rejected();
            return false;
        }

        self.add(key, record);
        true
    }

    // == Remove ==
    /// Removes the record for `key`. Returns true if it was present.
    pub fn remove(&mut self, key: &PodKey) -> bool {
        let removed = self.entries.pop(key).is_some();
        if removed {
            self.stats.record_removal();
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Keys ==
    /// Returns the cached keys, most recently used first.
    pub fn keys(&self) -> Vec<PodKey> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
