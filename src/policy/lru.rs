//! # Least Recently Used (LRU) Cache Implementation
//!
//! A capacity-bounded LRU cache whose recency order lives in an arena-backed
//! intrusive list. The same core is used twice by the LRU-K engine: once for
//! admitted values and once for observation counts.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                                  │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                    Arc<Mutex<LruCore<K, V>>>                       │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                         LruCore<K, V>                              │ │
//!   │   │                                                                    │ │
//!   │   │   ┌──────────────────────────────────────────────────────────────┐ │ │
//!   │   │   │  FxHashMap<K, SlotId> (index into the list arena)            │ │ │
//!   │   │   └──────────────────────────────────────────────────────────────┘ │ │
//!   │   │                                                                    │ │
//!   │   │   ┌──────────────────────────────────────────────────────────────┐ │ │
//!   │   │   │  IntrusiveList<Entry<K, V>> (recency order)                  │ │ │
//!   │   │   │                                                              │ │ │
//!   │   │   │  head ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── tail      │ │ │
//!   │   │   │   (LRU)   │ a:1  │      │ b:2  │      │ c:3  │   (MRU)       │ │ │
//!   │   │   │           └──────┘      └──────┘      └──────┘               │ │ │
//!   │   │   │                                                              │ │ │
//!   │   │   │  next eviction ◄──────────────────────► most recently used   │ │ │
//!   │   │   └──────────────────────────────────────────────────────────────┘ │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   PUT new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!
//!   put(D):
//!     1. Evict [A] from head (both index and list)
//!     2. Push [D] at tail
//!
//!     head ──► [B] ◄──► [C] ◄──► [D] ◄── tail
//!
//!   GET hit
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!   get(B):
//!     1. Find SlotId in index: O(1)
//!     2. Splice [B] to tail, bump its access count: O(1)
//!
//!     head ──► [C] ◄──► [D] ◄──► [B] ◄── tail
//! ```
//!
//! ## Key Components
//!
//! | Component         | Description                                          |
//! |-------------------|------------------------------------------------------|
//! | `Entry<K, V>`     | Key, value and access count stored in a list node    |
//! | `LruCore<K, V>`   | Unsynchronized index + recency list                  |
//! | `LruCache<K, V>`  | `LruCore` behind one `parking_lot::Mutex`            |
//!
//! ## Invariants
//!
//! - `index.len() == order.len() <= capacity` after every operation.
//! - Every key in the index names exactly one list node holding that key.
//! - The tail is the most recently put or hit key; the head is the next victim.
//!
//! `check_invariants` verifies all three.
//!
//! ## Capacity 0
//!
//! A cache built with capacity 0 accepts no entries: `put` is a no-op and every
//! read misses. Use [`LruCache::try_new`] to reject that configuration instead.
//!
//! ## Thread Safety
//!
//! - `LruCore`: single-threaded, `&mut self` for anything that touches recency.
//! - `LruCache`: every public method holds the mutex for its whole duration, so
//!   concurrent callers observe a single total order of operations. Cloning an
//!   `LruCache` shares the same instance.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//!
//! let cache: LruCache<&str, u32> = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a"); // a becomes most recent
//! cache.put("c", 3); // evicts b
//!
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(1));
//! assert_eq!(cache.get(&"c"), Some(3));
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::{CachePolicy, ConcurrentCache};

/// Upper bound on up-front index/arena reservation.
const MAX_PREALLOC: usize = 4096;

/// A cached record in the recency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: V,
    access_count: u64,
}

impl<K, V> Entry<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            access_count: 1,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Insertions plus `get` hits since this entry was created.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }
}

/// Single-threaded LRU core: key index plus arena-backed recency list.
///
/// Front of `order` is least recently used, back is most recently used.
pub struct LruCore<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty core holding at most `capacity` entries.
    ///
    /// A capacity of 0 creates a core that ignores every insert.
    ///
    /// # Example
    /// ```
    /// use lrukit::policy::lru::LruCore;
    ///
    /// let core: LruCore<u32, String> = LruCore::new(100);
    /// assert_eq!(core.capacity(), 100);
    /// assert!(core.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        let reserve = capacity.min(MAX_PREALLOC);
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            order: IntrusiveList::with_capacity(reserve),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// An existing key keeps its access count and moves to the tail. A new key
    /// evicts the head first when the core is full.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.capacity == 0 {
            return None;
        }

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            self.order.move_to_back(id);
            let entry = self.order.get_mut(id)?;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.order.push_back(Entry::new(key.clone(), value));
        self.index.insert(key, id);
        None
    }

    /// Returns the value for `key`, moving it to the tail on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_mut(key).map(|value| &*value)
    }

    /// Mutable form of [`get`](Self::get); also counts as an access.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.order.move_to_back(id);
        let entry = self.order.get_mut(id)?;
        entry.access_count += 1;
        Some(&mut entry.value)
    }

    /// Returns the value for `key` without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(Entry::value)
    }

    /// Moves `key` to the tail without reading it; `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.order.move_to_back(id),
            None => false,
        }
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.index.remove(key)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        self.order.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_front()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.front().map(|entry| (&entry.key, &entry.value))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Access count of the entry for `key`, without touching recency.
    pub fn access_count(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(Entry::access_count)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.order.clear();
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<K, V>> {
        self.order.iter()
    }

    /// Keys from least to most recently used.
    pub fn keys_lru_to_mru(&self) -> Vec<K> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Checks that the index and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_invariants()?;

        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but the recency list holds {} nodes",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.order.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "slot {} holds a different key than the index expects",
                        id.index()
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!(
                        "index points at free slot {}",
                        id.index()
                    )));
                },
            }
        }
        Ok(())
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.order.pop_front() {
            self.index.remove(&entry.key);

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            trace!(len = self.index.len(), capacity = self.capacity, "evicted lru head");
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evicted_entries: self.metrics.evicted_entries,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            clear_calls: self.metrics.clear_calls,
            cache_len: self.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache: one mutex guards the index and the recency list
/// together.
pub struct LruCache<K, V> {
    inner: Arc<Mutex<LruCore<K, V>>>,
}

impl<K, V> Clone for LruCache<K, V> {
    fn clone(&self) -> Self {
        LruCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// Capacity 0 is accepted and yields a cache that never stores anything.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            debug!("lru cache created with capacity 0; puts will be ignored");
        }
        LruCache {
            inner: Arc::new(Mutex::new(LruCore::new(capacity))),
        }
    }

    /// Like [`new`](Self::new), but rejects capacity 0.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero("capacity"));
        }
        Ok(Self::new(capacity))
    }

    /// Inserts or overwrites `key`, evicting the least recently used entry
    /// when full. Returns the previous value for an existing key.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, &str> = LruCache::new(4);
    /// assert_eq!(cache.put(1, "first"), None);
    /// assert_eq!(cache.put(1, "updated"), Some("first"));
    /// ```
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut core = self.inner.lock();
        core.insert(key, value)
    }

    /// Returns a clone of the value for `key`, moving it to the MRU position.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut core = self.inner.lock();
        core.get(key).cloned()
    }

    /// Value-only read: `V::default()` on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Reads without affecting recency.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, &str> = LruCache::new(2);
    /// cache.put(1, "first");
    /// cache.put(2, "second");
    ///
    /// assert_eq!(cache.peek(&1), Some("first"));
    /// cache.put(3, "third"); // 1 was still least recent
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let core = self.inner.lock();
        core.peek(key).cloned()
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut core = self.inner.lock();
        core.remove(key)
    }

    pub fn touch(&self, key: &K) -> bool {
        let mut core = self.inner.lock();
        core.touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        let mut core = self.inner.lock();
        core.pop_lru()
    }

    pub fn peek_lru(&self) -> Option<(K, V)>
    where
        V: Clone,
    {
        let core = self.inner.lock();
        core.peek_lru().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn access_count(&self, key: &K) -> Option<u64> {
        let core = self.inner.lock();
        core.access_count(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        let core = self.inner.lock();
        core.contains(key)
    }

    pub fn len(&self) -> usize {
        let core = self.inner.lock();
        core.len()
    }

    pub fn is_empty(&self) -> bool {
        let core = self.inner.lock();
        core.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let core = self.inner.lock();
        core.capacity()
    }

    pub fn clear(&self) {
        let mut core = self.inner.lock();
        core.clear();
    }

    /// Snapshot of keys from least to most recently used.
    pub fn keys_lru_to_mru(&self) -> Vec<K> {
        let core = self.inner.lock();
        core.keys_lru_to_mru()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let core = self.inner.lock();
        core.check_invariants()
    }

    /// Runs `f` with exclusive access to the core, holding the lock for the
    /// whole closure so several steps can be made atomic.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut LruCore<K, V>) -> R) -> R {
        let mut core = self.inner.lock();
        f(&mut core)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        let core = self.inner.lock();
        core.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn clear(&self) {
        LruCache::clear(self)
    }
}

impl<K: Send, V: Send> ConcurrentCache for LruCache<K, V> {}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.index.len())
            .field("capacity", &core.capacity)
            .finish_non_exhaustive()
    }
}
