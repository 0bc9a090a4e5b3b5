//! # LRU-K Cache Implementation
//!
//! LRU-K admits a key into the main cache only after it has been observed K
//! times. Until then the key lives in a bounded *history* cache that counts
//! observations, and the value from its latest `put` waits in a pending map.
//! One-off accesses never displace proven entries from the main cache.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                         LrukCache<K, V>                                  │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │             Arc<Mutex<LrukCore<K, V>>>  (one lock, all tiers)      │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │          ┌───────────────────────┼─────────────────────────┐             │
//!   │          ▼                       ▼                         ▼             │
//!   │   ┌──────────────┐     ┌───────────────────┐     ┌───────────────────┐   │
//!   │   │ main         │     │ history           │     │ pending           │   │
//!   │   │ LruCore<K,V> │     │ LruCore<K, u64>   │     │ FxHashMap<K, V>   │   │
//!   │   │ (capacity)   │     │ (history_capacity)│     │ (values awaiting  │   │
//!   │   │              │     │  key → count      │     │  promotion)       │   │
//!   │   └──────────────┘     └───────────────────┘     └───────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Lifecycle
//!
//! ```text
//!   Untracked ──observe──► Tracked(count < k) ──count reaches k──► Promoted
//!     ▲   ▲                   ▲        │                             │
//!     │   │ history eviction  │        │                             │
//!     │   └───────────────────┼────────┘                             │
//!     │                       └──── main eviction, read while admitted
//!     └──────────── remove, or main eviction of an unread key ───────┘
//! ```
//!
//! Promotion inserts the pending value into main and deletes the history count
//! and pending value in the same critical section. Every `get` still counts an
//! observation, including hits on admitted keys, so a key read while admitted
//! carries that count with it when main evicts it. Re-admission then needs K
//! observations minus the ones counted while it was admitted. A key that was
//! only written while admitted re-enters cold.
//!
//! ## Operations
//!
//! | Method          | Main hit                      | Main miss                            |
//! |-----------------|-------------------------------|--------------------------------------|
//! | `get(&k)`       | count += 1, return value      | count += 1, promote if count ≥ K and |
//! |                 |                               | a pending value exists, else miss    |
//! | `put(k, v)`     | overwrite in main             | count += 1, pending[k] = v, promote  |
//! |                 |                               | if count ≥ K                         |
//! | `remove(&k)`    | drop from every tier          | drop from every tier                 |
//!
//! ## Invariants
//!
//! - Each tier individually satisfies the LRU core invariants.
//! - A key is never both admitted to main and pending.
//! - Every pending key has a history count, so `pending ≤ history ≤
//!   history_capacity`. When history evicts a key its pending value goes too.
//!
//! ## Thread Safety
//!
//! The inner tiers are plain [`LruCore`]s with no locks of their own. The only
//! lock is the one in `LrukCache`, held for the whole read-main →
//! count → pending → admit sequence, so two callers racing on the same key can
//! neither promote it twice nor lose its pending value.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::policy::lru_k::LrukCache;
//!
//! // main capacity 2, history capacity 8, K = 2
//! let cache: LrukCache<&str, u32> = LrukCache::new(2, 8, 2);
//!
//! cache.put("page", 1);
//! assert!(!cache.contains(&"page")); // seen once, still pending
//!
//! assert_eq!(cache.get(&"page"), Some(1)); // second observation promotes
//! assert!(cache.contains(&"page"));
//! ```
//!
//! ## Academic Reference
//!
//! O'Neil, E. J., O'Neil, P. E., & Weikum, G. (1993).
//! "The LRU-K page replacement algorithm for database disk buffering."
//! ACM SIGMOD Record, 22(2), 297-306.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruKMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruKMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, LruKMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, ConcurrentCache};

/// Promotion threshold used by [`LruKConfig::default`] (LRU-2).
pub const DEFAULT_K: usize = 2;

/// Construction parameters for an LRU-K cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruKConfig {
    /// Main cache capacity (admitted entries).
    pub capacity: usize,
    /// History cache capacity (tracked, not yet admitted keys).
    pub history_capacity: usize,
    /// Observations required before admission.
    pub k: usize,
}

impl LruKConfig {
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Self {
        Self {
            capacity,
            history_capacity,
            k,
        }
    }

    /// Rejects settings that would make a tier inert or the threshold
    /// meaningless.
    ///
    /// ```
    /// use lrukit::policy::lru_k::LruKConfig;
    ///
    /// assert!(LruKConfig::new(10, 20, 2).validate().is_ok());
    /// assert!(LruKConfig::new(10, 0, 2).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::zero("capacity"));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::zero("history_capacity"));
        }
        if self.k == 0 {
            return Err(ConfigError::new("k", "must be >= 1"));
        }
        Ok(())
    }
}

impl Default for LruKConfig {
    fn default() -> Self {
        Self {
            capacity: 128,
            history_capacity: 128,
            k: DEFAULT_K,
        }
    }
}

/// Where a key currently sits in the admission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Neither admitted nor tracked.
    Untracked,
    /// Counted in history; `pending` is `true` when a value awaits promotion.
    Tracked { count: u64, pending: bool },
    /// Resident in the main cache.
    Promoted,
}

/// Single-threaded LRU-K core composing a main tier, a history tier and the
/// pending-value map.
pub struct LrukCore<K, V> {
    main: LruCore<K, V>,
    history: LruCore<K, u64>,
    pending: FxHashMap<K, V>,
    k: usize,
    #[cfg(feature = "metrics")]
    metrics: LruKMetrics,
}

impl<K, V> LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a core; `k == 0` behaves as `k == 1`.
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Self {
        LrukCore {
            main: LruCore::new(capacity),
            history: LruCore::new(history_capacity),
            pending: FxHashMap::default(),
            k: k.max(1),
            #[cfg(feature = "metrics")]
            metrics: LruKMetrics::default(),
        }
    }

    pub fn with_config(config: LruKConfig) -> Self {
        Self::new(config.capacity, config.history_capacity, config.k)
    }

    /// Looks up `key`, counting the access and promoting it when its count
    /// reaches K and a pending value exists.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        if let Some(value) = self.main.get(key).cloned() {
            self.observe(key);

            #[cfg(feature = "metrics")]
            self.metrics.record_get_hit();

            return Some(value);
        }

        let count = self.observe(key);
        if self.reached_k(count) {
            if let Some(value) = self.pending.remove(key) {
                self.history.remove(key);
                self.admit(key.clone(), value.clone());

                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();

                return Some(value);
            }
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_get_miss();

        None
    }

    /// Writes `key`. Admitted keys are overwritten in place; others are
    /// counted and held pending until they reach K observations.
    pub fn put(&mut self, key: K, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.main.contains(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            self.main.insert(key, value);
            return;
        }

        let count = self.observe(&key);
        if self.reached_k(count) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_new();

            self.history.remove(&key);
            self.pending.remove(&key);
            self.admit(key, value);
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_pending_write();

        // A disabled history tier retains no count, so nothing may stay pending.
        if self.history.contains(&key) {
            self.pending.insert(key, value);
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_pending_drop();

            trace!(tier = "history", "history tier disabled, pending value discarded");
        }
    }

    /// Removes `key` from every tier.
    ///
    /// Returns the admitted value if there was one, otherwise the pending
    /// value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let admitted = self.main.remove(key);
        self.history.remove(key);
        let pending = self.pending.remove(key);
        let removed = admitted.or(pending);

        #[cfg(feature = "metrics")]
        if removed.is_some() {
            self.metrics.record_remove_found();
        }

        removed
    }

    /// Reads an admitted value without counting an observation.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.main.peek(key)
    }

    /// `true` if `key` is admitted to the main cache.
    pub fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Main cache capacity.
    pub fn capacity(&self) -> usize {
        self.main.capacity()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Observation count recorded in history, without counting this call.
    pub fn history_count(&self, key: &K) -> Option<u64> {
        self.history.peek(key).copied()
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn state(&self, key: &K) -> KeyState {
        if self.main.contains(key) {
            return KeyState::Promoted;
        }
        match self.history.peek(key) {
            Some(&count) => KeyState::Tracked {
                count,
                pending: self.pending.contains_key(key),
            },
            None => KeyState::Untracked,
        }
    }

    /// Admitted keys from least to most recently used.
    pub fn keys_lru_to_mru(&self) -> Vec<K> {
        self.main.keys_lru_to_mru()
    }

    /// Tracked keys from least to most recently observed.
    pub fn history_keys_lru_to_mru(&self) -> Vec<K> {
        self.history.keys_lru_to_mru()
    }

    /// Drops admitted entries, history and pending values.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.main.clear();
        self.history.clear();
        self.pending.clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.main.check_invariants().map_err(|e| e.in_tier("main"))?;
        self.history
            .check_invariants()
            .map_err(|e| e.in_tier("history"))?;

        for key in self.pending.keys() {
            if self.main.contains(key) {
                return Err(InvariantError::new(
                    "key is both admitted to main and pending promotion",
                ));
            }
            if !self.history.contains(key) {
                return Err(InvariantError::new("pending value has no count").in_tier("history"));
            }
        }
        if self.history.iter().any(|entry| *entry.value() == 0) {
            return Err(InvariantError::new("zero observation count").in_tier("history"));
        }
        Ok(())
    }

    /// Increments the history count for `key`, making it the most recently
    /// observed, and returns the new count.
    ///
    /// Tracking a new key may evict the history head; that key's pending value
    /// is dropped with it. With history capacity 0 the count is 1 and nothing
    /// is retained.
    fn observe(&mut self, key: &K) -> u64 {
        #[cfg(feature = "metrics")]
        self.metrics.record_history_observation();

        if let Some(count) = self.history.get_mut(key) {
            *count += 1;
            return *count;
        }

        let capacity = self.history.capacity();
        if capacity == 0 {
            return 1;
        }
        if self.history.len() >= capacity {
            if let Some((evicted, _)) = self.history.pop_lru() {
                #[cfg(feature = "metrics")]
                self.metrics.record_history_eviction();

                let dropped = self.pending.remove(&evicted).is_some();

                #[cfg(feature = "metrics")]
                if dropped {
                    self.metrics.record_pending_drop();
                }

                trace!(tier = "history", dropped_pending = dropped, "evicted history head");
            }
        }
        self.history.insert(key.clone(), 1);
        1
    }

    fn reached_k(&self, count: u64) -> bool {
        count >= self.k as u64
    }

    fn admit(&mut self, key: K, value: V) {
        let capacity = self.main.capacity();
        if capacity == 0 {
            trace!(tier = "main", k = self.k, "main tier disabled, promoted value discarded");
            return;
        }
        if self.main.len() >= capacity {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            trace!(tier = "main", "admission evicts main head");
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_promotion();

        self.main.insert(key, value);
        trace!(k = self.k, len = self.main.len(), "promoted key into main cache");
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruKMetricsSnapshot {
        LruKMetricsSnapshot {
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
            history_observations: self.metrics.history_observations,
            history_evictions: self.metrics.history_evictions,
            promotions: self.metrics.promotions,
            pending_writes: self.metrics.pending_writes,
            pending_drops: self.metrics.pending_drops,
            cache_len: self.main.len(),
            capacity: self.main.capacity(),
            history_len: self.history.len(),
            history_capacity: self.history.capacity(),
            pending_len: self.pending.len(),
        }
    }
}

impl<K, V> fmt::Debug for LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukCore")
            .field("k", &self.k)
            .field("len", &self.main.len())
            .field("capacity", &self.main.capacity())
            .field("history_len", &self.history.len())
            .field("pending_len", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// Thread-safe LRU-K cache. One mutex covers the main tier, the history tier
/// and the pending map.
pub struct LrukCache<K, V> {
    inner: Arc<Mutex<LrukCore<K, V>>>,
}

impl<K, V> Clone for LrukCache<K, V> {
    fn clone(&self) -> Self {
        LrukCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with the given main capacity, history capacity and K.
    ///
    /// Capacity 0 silently disables that tier only; `k == 0` behaves as 1.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    ///
    /// let cache: LrukCache<u32, String> = LrukCache::new(100, 400, 3);
    /// assert_eq!(cache.capacity(), 100);
    /// assert_eq!(cache.history_capacity(), 400);
    /// assert_eq!(cache.k(), 3);
    /// ```
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Self {
        if capacity == 0 {
            debug!("lru-k main capacity is 0; nothing will be admitted");
        }
        if history_capacity == 0 {
            debug!("lru-k history capacity is 0; observations are not retained");
        }
        if k == 0 {
            debug!("lru-k k = 0 behaves as k = 1");
        }
        LrukCache {
            inner: Arc::new(Mutex::new(LrukCore::new(capacity, history_capacity, k))),
        }
    }

    pub fn with_config(config: LruKConfig) -> Self {
        Self::new(config.capacity, config.history_capacity, config.k)
    }

    /// Like [`new`](Self::new), but rejects zero capacities and `k == 0`.
    pub fn try_new(capacity: usize, history_capacity: usize, k: usize) -> Result<Self, ConfigError> {
        Self::try_with_config(LruKConfig::new(capacity, history_capacity, k))
    }

    pub fn try_with_config(config: LruKConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    pub fn put(&self, key: K, value: V) {
        let mut core = self.inner.lock();
        core.put(key, value);
    }

    /// Counts an observation of `key` and returns its value if admitted or
    /// promoted by this call.
    ///
    /// # Example
    ///
    /// ```
    /// use lrukit::policy::lru_k::LrukCache;
    ///
    /// let cache: LrukCache<u32, &str> = LrukCache::new(4, 4, 3);
    /// cache.put(7, "v");                    // observation 1
    /// assert_eq!(cache.get(&7), None);      // observation 2
    /// assert_eq!(cache.get(&7), Some("v")); // observation 3: promoted
    /// assert_eq!(cache.get(&7), Some("v")); // main hit
    /// ```
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut core = self.inner.lock();
        core.get(key)
    }

    /// Value-only read: `V::default()` on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Reads an admitted value without counting an observation.
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

    pub fn k(&self) -> usize {
        let core = self.inner.lock();
        core.k()
    }

    pub fn history_capacity(&self) -> usize {
        let core = self.inner.lock();
        core.history_capacity()
    }

    pub fn history_len(&self) -> usize {
        let core = self.inner.lock();
        core.history_len()
    }

    pub fn pending_len(&self) -> usize {
        let core = self.inner.lock();
        core.pending_len()
    }

    pub fn history_count(&self, key: &K) -> Option<u64> {
        let core = self.inner.lock();
        core.history_count(key)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        let core = self.inner.lock();
        core.is_pending(key)
    }

    pub fn state(&self, key: &K) -> KeyState {
        let core = self.inner.lock();
        core.state(key)
    }

    pub fn keys_lru_to_mru(&self) -> Vec<K> {
        let core = self.inner.lock();
        core.keys_lru_to_mru()
    }

    pub fn clear(&self) {
        let mut core = self.inner.lock();
        core.clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let core = self.inner.lock();
        core.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruKMetricsSnapshot {
        let core = self.inner.lock();
        core.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruKMetricsSnapshot> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruKMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> CachePolicy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        LrukCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LrukCache::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LrukCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LrukCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LrukCache::len(self)
    }

    fn capacity(&self) -> usize {
        LrukCache::capacity(self)
    }

    fn clear(&self) {
        LrukCache::clear(self)
    }
}

impl<K: Send, V: Send> ConcurrentCache for LrukCache<K, V> {}

impl<K, V> fmt::Debug for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LrukCache")
            .field("core", &*core)
            .finish()
    }
}
