#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

/// LRU-K counters. Every `put` lands in exactly one of `insert_updates`
/// (admitted key overwritten), `insert_new` (key reached K and was promoted)
/// or `pending_writes` (key still below K; the value waits, or is dropped when
/// history is disabled), so the three sum to `insert_calls`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruKMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub clear_calls: u64,

    pub history_observations: u64,
    pub history_evictions: u64,
    pub promotions: u64,
    pub pending_writes: u64,
    pub pending_drops: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub history_len: usize,
    pub history_capacity: usize,
    pub pending_len: usize,
}

impl LruMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

impl LruKMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    ///
    /// A `get` that triggers promotion counts as a hit.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
