//! # Metrics Recorder Traits
//!
//! Recording and snapshotting are split into small traits so engine code only
//! ever calls `record_*` and tests/benches only ever read snapshots.
//!
//! ```text
//!            ┌─────────────────────────────┐
//!            │     CoreMetricsRecorder     │
//!            │  get_hit/get_miss/insert    │
//!            │  evict/remove/clear         │
//!            └──────────────┬──────────────┘
//!                           │
//!                           ▼
//!            ┌─────────────────────────────┐
//!            │     LruKMetricsRecorder     │
//!            │  history observe/evict      │
//!            │  promotion/pending write    │
//!            │  pending drop               │
//!            └─────────────────────────────┘
//!
//!   Consumption:  MetricsSnapshotProvider<S> → S (plain `Copy` struct)
//! ```

/// Common counters for any cache engine.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_clear(&mut self);
}

/// Admission-side counters for LRU-K.
pub trait LruKMetricsRecorder: CoreMetricsRecorder {
    fn record_history_observation(&mut self);
    fn record_history_eviction(&mut self);
    fn record_promotion(&mut self);
    /// A `put` that left its value pending instead of admitting it.
    fn record_pending_write(&mut self);
    fn record_pending_drop(&mut self);
}

/// Point-in-time copy of an engine's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
