//! Error types for pool construction, acquisition, and release.
//!
//! Exhaustion and timeout are recoverable and returned to the immediate
//! caller; the pool never retries on its own.

use std::time::Duration;
use thiserror::Error;

/// Error returned by pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// The pool was configured with a capacity of zero
    #[error("invalid pool capacity: capacity must be at least 1")]
    InvalidCapacity,

    /// The factory failed while the pool was being built
    #[error("failed to create resource: {0}")]
    CreationFailed(String),

    /// No resource is free and the non-blocking policy is in effect
    #[error("resource pool exhausted")]
    Exhausted,

    /// A blocking acquire waited past its deadline
    #[error("timed out after {0:?} waiting for a resource")]
    AcquireTimeout(Duration),

    /// A release was attempted on a lease that no longer holds its resource
    #[error("double release: resource is not currently leased")]
    DoubleRelease,

    /// A resource failed to reset on release and was retired from the pool
    #[error("reset failed for slot {0}; resource retired")]
    ResetFailed(usize),
}

/// Convenience alias for pool results.
pub type Result<T, E = PoolError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PoolError::Exhausted.to_string(),
            "resource pool exhausted"
        );
        assert_eq!(
            PoolError::ResetFailed(3).to_string(),
            "reset failed for slot 3; resource retired"
        );
        assert!(PoolError::AcquireTimeout(Duration::from_millis(250))
            .to_string()
            .contains("250ms"));
    }
}
