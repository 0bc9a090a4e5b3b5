//! Unified cache builder for both eviction policies.
//!
//! Lets callers pick LRU or LRU-K at runtime and work with one concrete type,
//! [`Cache`], which dispatches to the selected engine.
//!
//! ## Example
//!
//! ```rust
//! use lrukit::builder::{CacheBuilder, EvictionPolicy};
//!
//! let cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::{ConfigError, InvariantError};
use crate::policy::lru::LruCache;
use crate::policy::lru_k::{DEFAULT_K, LruKConfig, LrukCache};
use crate::traits::{CachePolicy, ConcurrentCache};

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Least Recently Used eviction.
    Lru,
    /// LRU-K admission in front of an LRU main tier. Uses the builder's
    /// `history_capacity` and `k`.
    LruK,
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
///
/// Cloning yields another handle to the same underlying cache.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    LruK(LrukCache<K, V>),
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            CacheInner::Lru(lru) => CacheInner::Lru(lru.clone()),
            CacheInner::LruK(lruk) => CacheInner::LruK(lruk.clone()),
        };
        Cache { inner }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// The policy this cache was built with.
    pub fn policy(&self) -> EvictionPolicy {
        match &self.inner {
            CacheInner::Lru(_) => EvictionPolicy::Lru,
            CacheInner::LruK(_) => EvictionPolicy::LruK,
        }
    }

    /// Insert or overwrite a key. Under LRU-K the value may wait in history
    /// until the key is admitted.
    pub fn put(&self, key: K, value: V) {
        match &self.inner {
            CacheInner::Lru(lru) => {
                lru.put(key, value);
            },
            CacheInner::LruK(lruk) => lruk.put(key, value),
        }
    }

    /// Get a clone of the value for a key.
    pub fn get(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::LruK(lruk) => lruk.get(key),
        }
    }

    /// Remove a key, returning its value if present.
    pub fn remove(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::LruK(lruk) => lruk.remove(key),
        }
    }

    /// Check if a key is resident (admitted, for LRU-K).
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::LruK(lruk) => lruk.contains(key),
        }
    }

    /// Return the number of resident entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::LruK(lruk) => lruk.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::LruK(lruk) => lruk.capacity(),
        }
    }

    /// Clear all entries, including LRU-K history.
    pub fn clear(&self) {
        match &self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::LruK(lruk) => lruk.clear(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.check_invariants(),
            CacheInner::LruK(lruk) => lruk.check_invariants(),
        }
    }

    /// The underlying LRU cache, if this is one.
    pub fn as_lru(&self) -> Option<&LruCache<K, V>> {
        match &self.inner {
            CacheInner::Lru(lru) => Some(lru),
            CacheInner::LruK(_) => None,
        }
    }

    /// The underlying LRU-K cache, if this is one.
    pub fn as_lru_k(&self) -> Option<&LrukCache<K, V>> {
        match &self.inner {
            CacheInner::Lru(_) => None,
            CacheInner::LruK(lruk) => Some(lruk),
        }
    }
}

impl<K, V> CachePolicy<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn put(&self, key: K, value: V) {
        Cache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        Cache::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        Cache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }

    fn clear(&self) {
        Cache::clear(self)
    }
}

impl<K: Send, V: Send> ConcurrentCache for Cache<K, V> {}

impl<K, V> fmt::Debug for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => f.debug_tuple("Cache::Lru").field(lru).finish(),
            CacheInner::LruK(lruk) => f.debug_tuple("Cache::LruK").field(lruk).finish(),
        }
    }
}

/// Builder for creating cache instances.
///
/// `history_capacity` defaults to the main capacity and `k` to 2; both are
/// ignored by [`EvictionPolicy::Lru`].
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
    history_capacity: Option<usize>,
    k: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history_capacity: None,
            k: DEFAULT_K,
        }
    }

    /// Set the LRU-K history capacity.
    pub fn history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = Some(history_capacity);
        self
    }

    /// Set the LRU-K promotion threshold.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    fn lru_k_config(&self) -> LruKConfig {
        LruKConfig::new(
            self.capacity,
            self.history_capacity.unwrap_or(self.capacity),
            self.k,
        )
    }

    /// Build a cache with the specified policy.
    ///
    /// Zero capacities and `k == 0` are accepted with the engines' silent
    /// semantics; use [`try_build`](Self::try_build) to reject them.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lrukit::builder::{CacheBuilder, EvictionPolicy};
    ///
    /// // LRU cache
    /// let cache = CacheBuilder::new(100).build::<u64, String>(EvictionPolicy::Lru);
    ///
    /// // LRU-3 with a 400-entry history
    /// let cache = CacheBuilder::new(100)
    ///     .history_capacity(400)
    ///     .k(3)
    ///     .build::<u64, String>(EvictionPolicy::LruK);
    /// assert_eq!(cache.as_lru_k().map(|c| c.k()), Some(3));
    /// ```
    pub fn build<K, V>(self, policy: EvictionPolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            EvictionPolicy::LruK => CacheInner::LruK(LrukCache::with_config(self.lru_k_config())),
        };

        Cache { inner }
    }

    /// Like [`build`](Self::build), but fails on a zero capacity or `k == 0`.
    pub fn try_build<K, V>(self, policy: EvictionPolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let inner = match policy {
            EvictionPolicy::Lru => CacheInner::Lru(LruCache::try_new(self.capacity)?),
            EvictionPolicy::LruK => {
                CacheInner::LruK(LrukCache::try_with_config(self.lru_k_config())?)
            },
        };

        Ok(Cache { inner })
    }
}
