#![deny(warnings)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # repool
//!
//! Fixed-capacity pooling of expensive, reusable resources with leased
//! checkout and checked reset-on-release.
//!
//! A [`Pool`] builds every resource it will ever own up front and hands out
//! exclusive [`Lease`]s. Dropping a lease (or releasing it explicitly)
//! resets the resource and parks it back in the pool; a resource that cannot
//! be reset is retired rather than reused, so state from one lease can never
//! leak into the next. Exhaustion is reported immediately by default, or
//! after a bounded FIFO wait with [`AcquirePolicy::Blocking`].
//!
//! ```
//! use repool::{Pool, Reusable};
//!
//! struct Conn {
//!     token: Option<String>,
//! }
//!
//! impl Reusable for Conn {
//!     fn reset(&mut self) -> bool {
//!         self.token = None;
//!         true
//!     }
//! }
//!
//! let pool = Pool::with_capacity(2, || Ok(Conn { token: None }))?;
//! {
//!     let mut lease = pool.try_acquire()?;
//!     lease.token = Some("session-1".into());
//! } // lease dropped: the connection is reset and returned
//! assert_eq!(pool.available(), 2);
//! # Ok::<(), repool::PoolError>(())
//! ```

/// Pool configuration and acquisition policies
pub mod config;

/// Error types for pool construction, acquisition, and release
pub mod error;

/// The pool core and its lease guard
pub mod pool;

/// The reset contract for pooled resources
pub mod resource;

// Re-export key types for easier access
pub use config::{AcquirePolicy, PoolConfig, DEFAULT_ACQUIRE_TIMEOUT};
pub use error::{PoolError, Result};
pub use pool::{Lease, Pool, PoolOccupancy, PoolStats};
pub use resource::Reusable;
