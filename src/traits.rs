//! # Cache Policy Contract
//!
//! The capability set every cache engine in this crate exposes to callers.
//! Engines implement it by composition rather than by extending each other:
//! [`LrukCache`](crate::policy::lru_k::LrukCache) *holds* an LRU core for its
//! main tier and another for its history tier, it is not a specialised LRU.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌─────────────────────────────────────────┐
//!                     │          CachePolicy<K, V>              │
//!                     │                                         │
//!                     │  put(&, K, V)                           │
//!                     │  get(&, &K) → Option<V>                 │
//!                     │  get_or_default(&, &K) → V              │
//!                     │  remove(&, &K) → Option<V>              │
//!                     │  contains / len / is_empty              │
//!                     │  capacity / clear                       │
//!                     └──────────────────┬──────────────────────┘
//!                                        │
//!            ┌───────────────────────────┼───────────────────────────┐
//!            ▼                           ▼                           ▼
//!   ┌──────────────────┐       ┌──────────────────┐       ┌──────────────────┐
//!   │  LruCache<K, V>  │       │ LrukCache<K, V>  │       │   Cache<K, V>    │
//!   │  Mutex<LruCore>  │       │ Mutex<LrukCore>  │       │ (builder enum)   │
//!   └──────────────────┘       └──────────────────┘       └──────────────────┘
//! ```
//!
//! All methods take `&self`: every implementation serializes its own
//! operations behind one lock, so a shared reference (or an `Arc`) is enough
//! to use a cache from many threads.
//!
//! ## Found vs. default reads
//!
//! `get` returns `None` on a miss. `get_or_default` returns `V::default()`
//! instead, which cannot be told apart from a stored default value; callers
//! that need the distinction use `get`.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::policy::lru::LruCache;
//! use lrukit::policy::lru_k::LrukCache;
//! use lrukit::traits::CachePolicy;
//!
//! fn warm<C: CachePolicy<u64, String>>(cache: &C, data: &[(u64, &str)]) {
//!     for (key, value) in data {
//!         cache.put(*key, value.to_string());
//!     }
//! }
//!
//! let lru = LruCache::new(8);
//! warm(&lru, &[(1, "a"), (2, "b")]);
//! assert_eq!(lru.get(&1).as_deref(), Some("a"));
//!
//! // LRU-2: a single put only records history
//! let lru_k = LrukCache::new(8, 16, 2);
//! warm(&lru_k, &[(1, "a")]);
//! assert!(!lru_k.contains(&1));
//! ```

/// Capability set shared by every cache engine.
pub trait CachePolicy<K, V> {
    /// Inserts or overwrites `key`.
    ///
    /// A cache with capacity 0 ignores the call.
    fn put(&self, key: K, value: V);

    /// Returns a clone of the value for `key`, updating recency on a hit.
    fn get(&self, key: &K) -> Option<V>;

    /// Value-only form of [`get`](Self::get): `V::default()` on a miss.
    fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op, so repeated removes are safe.
    fn remove(&self, key: &K) -> Option<V>;

    /// Returns `true` if `key` is resident, without updating recency.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    /// Drops every entry (and, for LRU-K, all history).
    fn clear(&self);
}

/// Marker for cache types that are safe to share across threads.
///
/// Implemented by the locked engines (`LruCache`, `LrukCache`) and the
/// builder's `Cache` wrapper when their key and value types allow it:
///
/// ```
/// use lrukit::policy::lru::LruCache;
/// use lrukit::traits::{CachePolicy, ConcurrentCache};
///
/// fn share<C: CachePolicy<u32, u32> + ConcurrentCache>(_cache: &C) {}
///
/// share(&LruCache::<u32, u32>::new(4));
/// ```
pub trait ConcurrentCache: Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Minimal unbounded implementation to exercise the provided methods.
    struct MapCache(Mutex<HashMap<i32, String>>);

    impl CachePolicy<i32, String> for MapCache {
        fn put(&self, key: i32, value: String) {
            self.0.lock().unwrap().insert(key, value);
        }

        fn get(&self, key: &i32) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn remove(&self, key: &i32) -> Option<String> {
            self.0.lock().unwrap().remove(key)
        }

        fn contains(&self, key: &i32) -> bool {
            self.0.lock().unwrap().contains_key(key)
        }

        fn len(&self) -> usize {
            self.0.lock().unwrap().len()
        }

        fn capacity(&self) -> usize {
            usize::MAX
        }

        fn clear(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    #[test]
    fn get_or_default_returns_default_on_miss() {
        let cache = MapCache(Mutex::new(HashMap::new()));
        assert_eq!(cache.get_or_default(&1), String::new());

        cache.put(1, "one".to_string());
        assert_eq!(cache.get_or_default(&1), "one");
    }

    #[test]
    fn stored_default_is_indistinguishable_without_found_form() {
        let cache = MapCache(Mutex::new(HashMap::new()));
        cache.put(1, String::new());

        assert_eq!(cache.get_or_default(&1), cache.get_or_default(&2));
        assert_eq!(cache.get(&1), Some(String::new()));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn is_empty_follows_len() {
        let cache = MapCache(Mutex::new(HashMap::new()));
        assert!(cache.is_empty());
        cache.put(1, "x".to_string());
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
