#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru::LruCore;

// Fuzz arbitrary operation sequences on LruCore
//
// First byte picks the capacity; each following pair is (op, key). After
// every step the core must stay within capacity and pass its invariant walk.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = (data[0] % 16) as usize;
    let mut cache: LruCore<u8, u32> = LruCore::new(capacity);

    for (step, pair) in data[1..].chunks_exact(2).enumerate() {
        let op = pair[0] % 8;
        let key = pair[1] % 32;
        let value = step as u32;

        match op {
            0 | 1 => {
                cache.insert(key, value);
                if capacity > 0 {
                    assert_eq!(cache.peek(&key), Some(&value));
                    assert!(cache.peek_lru().is_some());
                }
            }
            2 => {
                if cache.get(&key).is_some() {
                    assert_eq!(cache.keys_lru_to_mru().last(), Some(&key));
                }
            }
            3 => {
                cache.remove(&key);
                assert!(!cache.contains(&key));
            }
            4 => {
                let old_len = cache.len();
                let popped = cache.pop_lru();
                if popped.is_some() {
                    assert_eq!(cache.len(), old_len - 1);
                } else {
                    assert_eq!(old_len, 0);
                }
            }
            5 => {
                let touched = cache.touch(&key);
                assert_eq!(touched, cache.contains(&key));
            }
            6 => {
                let before = cache.access_count(&key);
                cache.peek(&key);
                assert_eq!(cache.access_count(&key), before);
            }
            _ => {
                if key == 0 {
                    cache.clear();
                    assert!(cache.is_empty());
                }
            }
        }

        assert!(cache.len() <= capacity);
        assert!(cache.check_invariants().is_ok());
    }
});
