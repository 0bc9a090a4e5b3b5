use crate::metrics::traits::{CoreMetricsRecorder, LruKMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct LruMetrics {
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
}

#[derive(Debug, Default, Clone)]
pub struct LruKMetrics {
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
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl CoreMetricsRecorder for LruKMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LruKMetricsRecorder for LruKMetrics {
    fn record_history_observation(&mut self) {
        self.history_observations += 1;
    }

    fn record_history_eviction(&mut self) {
        self.history_evictions += 1;
    }

    fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    fn record_pending_write(&mut self) {
        self.pending_writes += 1;
    }

    fn record_pending_drop(&mut self) {
        self.pending_drops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hit_and_miss_both_count_as_calls() {
        let mut m = LruMetrics::default();
        m.record_get_hit();
        m.record_get_miss();
        m.record_get_miss();
        assert_eq!(m.get_calls, 3);
        assert_eq!(m.get_hits, 1);
        assert_eq!(m.get_misses, 2);
    }

    #[test]
    fn lru_k_recorder_tracks_admission_counters() {
        let mut m = LruKMetrics::default();
        m.record_history_observation();
        m.record_history_observation();
        m.record_promotion();
        m.record_pending_write();
        m.record_pending_drop();
        m.record_history_eviction();
        assert_eq!(m.history_observations, 2);
        assert_eq!(m.promotions, 1);
        assert_eq!(m.pending_writes, 1);
        assert_eq!(m.pending_drops, 1);
        assert_eq!(m.history_evictions, 1);
    }
}
