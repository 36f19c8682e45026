//! Fixed-capacity pooling of reusable resources.
//!
//! The pool owns an arena of resources built once at construction. Callers
//! check resources out as exclusive [`Lease`]s and the pool reclaims them
//! deterministically: reset first, then back into the free queue, or retired
//! if the reset fails.

/// Pool bookkeeping: the arena, free queue, and wait queue
pub mod core;

/// The lease guard returned by a successful acquire
pub mod lease;

// Re-export key types
pub use self::core::{Pool, PoolOccupancy, PoolStats};
pub use self::lease::Lease;
