#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::policy::lru_k::{KeyState, LrukCore};

// Fuzz arbitrary operation sequences on LrukCore
//
// Header bytes pick main capacity, history capacity and k. Checks tier
// bounds and cross-tier invariants after every operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let capacity = (data[0] % 8) as usize;
    let history_capacity = (data[1] % 8) as usize;
    let k = (data[2] % 4) as usize;
    let mut cache: LrukCore<u8, u32> = LrukCore::new(capacity, history_capacity, k);

    for (step, pair) in data[3..].chunks_exact(2).enumerate() {
        let op = pair[0] % 5;
        let key = pair[1] % 24;
        let value = step as u32;

        match op {
            0 | 1 => {
                cache.put(key, value);
                if cache.is_pending(&key) {
                    assert!(!cache.contains(&key));
                }
                if cache.contains(&key) {
                    assert_eq!(cache.peek(&key), Some(&value));
                }
            }
            2 => {
                let was_admitted = cache.contains(&key);
                let got = cache.get(&key);
                if was_admitted {
                    assert!(got.is_some());
                }
            }
            3 => {
                cache.remove(&key);
                assert_eq!(cache.state(&key), KeyState::Untracked);
            }
            _ => {
                if key == 0 {
                    cache.clear();
                    assert_eq!(cache.history_len(), 0);
                }
            }
        }

        assert!(cache.len() <= capacity);
        assert!(cache.history_len() <= history_capacity);
        assert!(cache.pending_len() <= cache.history_len());
        assert!(cache.check_invariants().is_ok());
    }
});
