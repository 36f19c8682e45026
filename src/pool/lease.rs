//! The lease guard: exclusive, scope-bound access to one pooled resource.

use crate::error::{PoolError, Result};
use crate::pool::core::PoolInner;
use crate::resource::Reusable;
use log::error;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// An exclusive lease on one pooled resource.
///
/// The lease owns the resource for its lifetime; no other caller can reach
/// it. Dropping the lease returns the resource to the pool on every exit
/// path, including unwinding, which is what keeps a crashed caller from
/// permanently losing a slot. [`Lease::release`] does the same explicitly
/// and surfaces reset failures instead of logging them.
pub struct Lease<R: Reusable> {
    inner: Arc<PoolInner<R>>,
    slot: usize,
    resource: Option<R>,
}

impl<R: Reusable> Lease<R> {
    pub(crate) fn new(inner: Arc<PoolInner<R>>, slot: usize, resource: R) -> Self {
        Self {
            inner,
            slot,
            resource: Some(resource),
        }
    }

    /// Stable identity of the leased slot within its pool.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Get a reference to the resource.
    ///
    /// # Panics
    ///
    /// Panics if the lease was already released explicitly.
    pub fn get(&self) -> &R {
        self.resource.as_ref().expect("lease already released")
    }

    /// Get a mutable reference to the resource.
    ///
    /// # Panics
    ///
    /// Panics if the lease was already released explicitly.
    pub fn get_mut(&mut self) -> &mut R {
        self.resource.as_mut().expect("lease already released")
    }

    /// Whether the lease still holds its resource.
    pub fn is_active(&self) -> bool {
        self.resource.is_some()
    }

    /// Return the resource to the pool ahead of scope exit.
    ///
    /// The first call performs the release, reporting
    /// [`PoolError::ResetFailed`] if the resource could not be scrubbed (the
    /// slot is then retired). A second call finds nothing to release and
    /// reports [`PoolError::DoubleRelease`] without touching pool
    /// bookkeeping; the drop after an explicit release is a no-op.
    pub fn release(&mut self) -> Result<()> {
        match self.resource.take() {
            Some(resource) => self.inner.return_slot(self.slot, resource),
            None => Err(PoolError::DoubleRelease),
        }
    }
}

impl<R: Reusable> Deref for Lease<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

impl<R: Reusable> DerefMut for Lease<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.get_mut()
    }
}

impl<R: Reusable> Drop for Lease<R> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            // Unwinding has nowhere to report a failed reset; the slot is
            // retired either way, so log and move on.
            if let Err(e) = self.inner.return_slot(self.slot, resource) {
                error!("release on drop failed: {}", e);
            }
        }
    }
}

impl<R: Reusable + fmt::Debug> fmt::Debug for Lease<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "Lease(slot {}, {:?})", self.slot, resource),
            None => write!(f, "Lease(slot {}, released)", self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Pool;

    #[derive(Debug)]
    struct Scratch {
        value: u32,
    }

    impl Reusable for Scratch {
        fn reset(&mut self) -> bool {
            self.value = 0;
            true
        }
    }

    fn scratch_pool(capacity: usize) -> Pool<Scratch> {
        Pool::with_capacity(capacity, || Ok(Scratch { value: 0 })).unwrap()
    }

    #[test]
    fn test_deref_access() {
        let pool = scratch_pool(1);
        let mut lease = pool.try_acquire().unwrap();

        lease.value = 42;
        assert_eq!(lease.value, 42);
        assert_eq!(lease.get().value, 42);
    }

    #[test]
    fn test_explicit_release_deactivates() {
        let pool = scratch_pool(1);
        let mut lease = pool.try_acquire().unwrap();
        assert!(lease.is_active());

        lease.release().unwrap();
        assert!(!lease.is_active());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_slot_identity_is_stable() {
        let pool = scratch_pool(1);

        let first = pool.try_acquire().unwrap();
        let slot = first.slot();
        drop(first);

        let second = pool.try_acquire().unwrap();
        assert_eq!(second.slot(), slot);
    }

    #[test]
    fn test_debug_formats_released_state() {
        let pool = scratch_pool(1);
        let mut lease = pool.try_acquire().unwrap();

        assert!(format!("{:?}", lease).contains("Scratch"));
        lease.release().unwrap();
        assert!(format!("{:?}", lease).contains("released"));
    }
}
