// ==============================================
// LRU CONCURRENCY TESTS (integration)
// ==============================================
//
// Every LruCache operation runs under one lock, so the final state after a
// concurrent run must be one some serialization of the same operations could
// produce.

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use lrukit::policy::lru::LruCache;

const THREADS: usize = 8;

// ==============================================
// Capacity Bound Under Contention
// ==============================================

mod capacity_bound {
    use super::*;

    #[test]
    fn len_stays_within_capacity() {
        let cache: LruCache<u64, u64> = LruCache::new(32);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..2_000u64 {
                        let key = (t as u64 * 7 + i) % 128;
                        cache.put(key, i);
                        cache.get(&((key + 3) % 128));
                        if i % 17 == 0 {
                            cache.remove(&key);
                        }
                        assert!(cache.len() <= 32);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 32);
        assert!(cache.check_invariants().is_ok());
    }
}

// ==============================================
// Linearizability
// ==============================================

mod linearizability {
    use super::*;

    #[test]
    fn disjoint_writers_keep_last_value() {
        // Capacity covers every key, so nothing is evicted and each key must
        // end with its writer's final value.
        let cache: LruCache<(usize, u64), u64> = LruCache::new(THREADS * 16);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for round in 0..100u64 {
                        for key in 0..16u64 {
                            cache.put((t, key), round);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), THREADS * 16);
        for t in 0..THREADS {
            for key in 0..16u64 {
                assert_eq!(cache.peek(&(t, key)), Some(99));
            }
        }
    }

    #[test]
    fn values_were_written_for_their_key() {
        let cache: LruCache<u64, u64> = LruCache::new(16);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..1_000u64 {
                        let key = i % 40;
                        // Value encodes the key, so a torn write would show
                        cache.put(key, key * 1_000 + t as u64);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for key in cache.keys_lru_to_mru() {
            let value = cache.peek(&key).unwrap();
            assert_eq!(value / 1_000, key);
            assert!((value % 1_000) < THREADS as u64);
        }
    }

    #[test]
    fn eviction_order_is_a_serialization() {
        // Each thread inserts its own keys in order; whatever survives must be
        // a suffix of every thread's sequence.
        let cache: LruCache<(usize, u64), ()> = LruCache::new(20);
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..500u64 {
                        cache.put((t, i), ());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let survivors: HashSet<_> = cache.keys_lru_to_mru().into_iter().collect();
        assert_eq!(survivors.len(), 20);
        for t in 0..4 {
            let mut seen_gap = false;
            for i in (0..500u64).rev() {
                if survivors.contains(&(t, i)) {
                    assert!(!seen_gap, "thread {t} survivor {i} follows an evicted key");
                } else {
                    seen_gap = true;
                }
            }
        }
    }
}

// ==============================================
// Atomic Multi-Step Access
// ==============================================

mod with_core {
    use super::*;

    #[test]
    fn read_modify_write_is_not_lost() {
        let cache: LruCache<&'static str, u64> = LruCache::new(4);
        cache.put("counter", 0);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = cache.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..1_000 {
                        cache.with_core(|core| {
                            if let Some(v) = core.get_mut(&"counter") {
                                *v += 1;
                            }
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.peek(&"counter"), Some(THREADS as u64 * 1_000));
    }
}
