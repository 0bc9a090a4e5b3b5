//! Error types for the lrukit library.
//!
//! Cache operations themselves never fail: a miss is `None`, and a tier with
//! capacity 0 silently ignores inserts. The types here cover the two places
//! where a caller can ask for a hard failure instead.
//!
//! - [`ConfigError`]: a validating constructor (`try_new`, `try_build`,
//!   `LruKConfig::validate`) rejected a parameter. Names the parameter.
//! - [`InvariantError`]: `check_invariants` found the index, the recency list
//!   or the LRU-K tiers disagreeing. Names the tier when the engine has more
//!   than one.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru_k::LrukCache;
//!
//! let cache: Result<LrukCache<String, i32>, ConfigError> = LrukCache::try_new(100, 200, 2);
//! assert!(cache.is_ok());
//!
//! let err = LrukCache::<String, i32>::try_new(100, 200, 0).unwrap_err();
//! assert_eq!(err.parameter(), "k");
//! ```

use std::fmt;

/// A construction parameter that a validating constructor refused.
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert_eq!(err.parameter(), "capacity");
/// assert_eq!(err.to_string(), "invalid capacity: must be > 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    parameter: &'static str,
    reason: String,
}

impl ConfigError {
    pub fn new(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }

    /// A capacity-like parameter was 0.
    pub fn zero(parameter: &'static str) -> Self {
        Self::new(parameter, "must be > 0")
    }

    /// Name of the rejected parameter (`"capacity"`, `"history_capacity"`, `"k"`).
    #[inline]
    pub fn parameter(&self) -> &'static str {
        self.parameter
    }

    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.parameter, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Internal structures of a cache disagree with each other.
///
/// Carries the failing tier (`"main"`, `"history"`) for LRU-K, `None` for a
/// single-tier engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError {
    tier: Option<&'static str>,
    message: String,
}

impl InvariantError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            tier: None,
            message: message.into(),
        }
    }

    /// Attributes the failure to `tier`, keeping an already-set tier.
    pub fn in_tier(mut self, tier: &'static str) -> Self {
        self.tier.get_or_insert(tier);
        self
    }

    #[inline]
    pub fn tier(&self) -> Option<&'static str> {
        self.tier
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            Some(tier) => write!(f, "{tier} tier: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}

    #[test]
    fn both_errors_are_std_errors() {
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }

    #[test]
    fn config_error_names_parameter() {
        let err = ConfigError::zero("history_capacity");
        assert_eq!(err.parameter(), "history_capacity");
        assert_eq!(err.reason(), "must be > 0");
        assert_eq!(err.to_string(), "invalid history_capacity: must be > 0");
    }

    #[test]
    fn invariant_without_tier_is_bare_message() {
        let err = InvariantError::new("cycle detected in list");
        assert_eq!(err.tier(), None);
        assert_eq!(err.to_string(), "cycle detected in list");
    }

    #[test]
    fn innermost_tier_wins() {
        let err = InvariantError::new("dangling slot")
            .in_tier("history")
            .in_tier("main");
        assert_eq!(err.tier(), Some("history"));
        assert_eq!(err.to_string(), "history tier: dangling slot");
        assert_eq!(err.message(), "dangling slot");
    }
}
