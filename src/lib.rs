//! lrukit: bounded LRU and LRU-K cache engines.
//!
//! - [`policy::lru`]: recency-ordered cache over an arena-backed list.
//! - [`policy::lru_k`]: K-observation admission in front of an LRU main tier.
//! - [`builder`]: pick either policy at runtime behind one [`builder::Cache`] type.
//!
//! Both engines are `Send + Sync` handles around a single `parking_lot` mutex,
//! so every operation is linearizable per instance.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
