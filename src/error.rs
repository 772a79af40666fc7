//! Error types for the poolkit library.
//!
//! ## Key Components
//!
//! - [`PoolError`]: Returned by pool and coordinator operations that the
//!   caller got wrong (unknown pool key, disposed pool, bad instance handle).
//! - [`ConfigError`]: Returned when pool configuration parameters are invalid
//!   (empty key, no templates, `max_size < initial_size`, unknown mode name).
//! - [`InvariantError`]: Returned by `check_invariants` when internal
//!   bookkeeping has diverged.
//!
//! Exhaustion is not an error: a pool that refuses to hand out an instance
//! answers `Ok(None)` and logs a warning.
//!
//! ## Example Usage
//!
//! ```
//! use poolkit::builder::PoolConfigBuilder;
//! use poolkit::error::ConfigError;
//!
//! let bad: Result<_, ConfigError> = PoolConfigBuilder::<&str>::new("bullets")
//!     .template("bullet")
//!     .initial_size(10)
//!     .max_size(5)
//!     .try_build();
//! assert!(bad.unwrap_err().to_string().contains("max_size"));
//! ```

use thiserror::Error;

/// Failure of a pool or coordinator operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No pool is registered under this key.
    #[error("pool not found: {0}")]
    PoolNotFound(String),

    /// The pool was disposed and can no longer be used.
    #[error("pool has been disposed")]
    Disposed,

    /// The instance handle is unknown, stale, or not in the expected state.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Error returned when pool configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Error returned when internal pool invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
