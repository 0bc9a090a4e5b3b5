pub use crate::builder::{Cache, CacheBuilder, EvictionPolicy};
pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{LruKMetricsSnapshot, LruMetricsSnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::MetricsSnapshotProvider;
pub use crate::policy::lru::{LruCache, LruCore};
pub use crate::policy::lru_k::{KeyState, LruKConfig, LrukCache, LrukCore};
pub use crate::traits::{CachePolicy, ConcurrentCache};
