//! Pool configuration.
//!
//! The pool has exactly two tunables: the fixed capacity and the behavior of
//! [`Pool::acquire`](crate::Pool::acquire) under exhaustion.

use crate::error::{PoolError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default wait budget for [`AcquirePolicy::blocking`].
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

/// How `acquire` behaves when no resource is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquirePolicy {
    /// Fail immediately with [`PoolError::Exhausted`].
    NonBlocking,

    /// Wait in FIFO order for a release, failing with
    /// [`PoolError::AcquireTimeout`] once the budget is spent.
    Blocking {
        /// Maximum time to wait for a resource to become free.
        timeout: Duration,
    },
}

impl AcquirePolicy {
    /// Blocking policy with [`DEFAULT_ACQUIRE_TIMEOUT`].
    pub fn blocking() -> Self {
        Self::Blocking {
            timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self::NonBlocking
    }
}

/// Configuration for a resource pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of resources built at construction, fixed for the pool's
    /// lifetime.
    pub capacity: usize,

    /// Behavior of `acquire` under exhaustion.
    #[serde(default)]
    pub policy: AcquirePolicy,
}

impl PoolConfig {
    /// Configuration with the given capacity and the default non-blocking
    /// policy.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            policy: AcquirePolicy::default(),
        }
    }

    /// Reject configurations no pool can be built from.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            policy: AcquirePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, 8);
        assert_eq!(config.policy, AcquirePolicy::NonBlocking);

        assert_eq!(
            AcquirePolicy::blocking(),
            AcquirePolicy::Blocking {
                timeout: DEFAULT_ACQUIRE_TIMEOUT
            }
        );
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = PoolConfig::with_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidCapacity)
        ));

        assert!(PoolConfig::with_capacity(1).validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = PoolConfig {
            capacity: 4,
            policy: AcquirePolicy::Blocking {
                timeout: Duration::from_millis(500),
            },
        };

        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: PoolConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.capacity, 4);
        assert_eq!(deserialized.policy, config.policy);
    }

    #[test]
    fn test_policy_defaults_when_missing() {
        let deserialized: PoolConfig = serde_json::from_str(r#"{"capacity": 2}"#).unwrap();
        assert_eq!(deserialized.capacity, 2);
        assert_eq!(deserialized.policy, AcquirePolicy::NonBlocking);
    }
}
