//! Pool bookkeeping: the arena, free queue, and wait queue.
//!
//! Resources live in a fixed arena allocated once at construction. Free
//! membership is a queue of indices served front-first, so selection is
//! deterministic and acquire/release are O(1). All bookkeeping sits behind a
//! single mutex; only index moves happen inside the critical section.

use crate::config::{AcquirePolicy, PoolConfig};
use crate::error::{PoolError, Result};
use crate::pool::lease::Lease;
use crate::resource::Reusable;
use log::{debug, trace, warn};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle state of one arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// Resource parked in the arena, index present in the free queue
    Free,

    /// Resource moved out into exactly one outstanding lease
    Leased,

    /// Reset failed; the slot is permanently out of service
    Retired,
}

/// One arena entry.
struct Slot<R> {
    /// The parked resource, `Some` only while the slot is free
    resource: Option<R>,

    /// Where the slot is in its free/leased/retired lifecycle
    state: SlotState,
}

/// Counters describing pool activity since construction.
#[derive(Debug, Default, Clone)]
pub struct PoolStats {
    /// Successful acquisitions, blocking and non-blocking
    pub acquired: usize,

    /// Resources reset and returned to the free queue
    pub released: usize,

    /// Non-blocking acquisitions refused because nothing was free
    pub exhausted: usize,

    /// Blocking acquisitions that gave up at their deadline
    pub timed_out: usize,

    /// Slots retired after a failed reset
    pub retired: usize,
}

/// Point-in-time occupancy of the pool, taken under a single lock so the
/// three counts are mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOccupancy {
    /// Slots currently free
    pub available: usize,

    /// Slots currently leased out
    pub leased: usize,

    /// Slots permanently retired
    pub retired: usize,
}

impl PoolOccupancy {
    /// Total slots accounted for; always equals the pool capacity.
    pub fn total(&self) -> usize {
        self.available + self.leased + self.retired
    }
}

/// Mutable bookkeeping, all guarded by one mutex.
struct PoolState<R> {
    /// The arena, allocated once at construction
    slots: Vec<Slot<R>>,

    /// Indices of free slots, served front-first
    free: VecDeque<usize>,

    /// Number of slots currently leased
    leased: usize,

    /// Number of slots permanently retired
    retired: usize,

    /// Tickets of blocked acquirers in arrival order
    waiters: VecDeque<u64>,

    /// Next ticket to hand to a blocked acquirer
    next_ticket: u64,

    /// Activity counters
    stats: PoolStats,
}

impl<R: Reusable> PoolState<R> {
    /// Pop the front free slot and move its resource out.
    fn take_free(&mut self) -> Option<(usize, R)> {
        let index = self.free.pop_front()?;
        let slot = &mut self.slots[index];
        debug_assert_eq!(slot.state, SlotState::Free);
        let resource = slot.resource.take().expect("free slot without resource");
        slot.state = SlotState::Leased;
        self.leased += 1;
        self.stats.acquired += 1;
        Some((index, resource))
    }

    /// Unlink a waiter ticket, wherever it sits in the queue.
    fn remove_waiter(&mut self, ticket: u64) {
        if let Some(position) = self.waiters.iter().position(|&t| t == ticket) {
            self.waiters.remove(position);
        }
    }
}

/// Shared pool internals; leases hold an `Arc` of this.
pub(crate) struct PoolInner<R> {
    /// All mutable bookkeeping
    state: Mutex<PoolState<R>>,

    /// Signalled whenever a slot returns to the free queue or a waiter leaves
    available: Condvar,

    /// Fixed slot count
    capacity: usize,
}

impl<R: Reusable> PoolInner<R> {
    /// Return a leased resource to its slot.
    ///
    /// The reset runs before the index re-enters the free queue; an unclean
    /// resource is never acquirable. A failed reset retires the slot.
    pub(crate) fn return_slot(&self, index: usize, mut resource: R) -> Result<()> {
        let mut state = self.state.lock();

        if state.slots[index].state != SlotState::Leased {
            return Err(PoolError::DoubleRelease);
        }
        state.leased -= 1;

        if !resource.reset() {
            state.slots[index].state = SlotState::Retired;
            state.retired += 1;
            state.stats.retired += 1;
            warn!("retiring slot {}: reset failed", index);
            return Err(PoolError::ResetFailed(index));
        }

        let slot = &mut state.slots[index];
        slot.resource = Some(resource);
        slot.state = SlotState::Free;
        state.free.push_back(index);
        state.stats.released += 1;
        trace!("slot {} released, {} free", index, state.free.len());
        drop(state);

        self.available.notify_all();
        Ok(())
    }
}

/// A fixed-capacity pool of reusable resources.
///
/// Every resource is built at construction; none are created or destroyed
/// afterwards, except that a slot whose resource fails to reset is retired
/// (reducing effective capacity). Cloning the pool is cheap and yields a
/// handle to the same shared state.
pub struct Pool<R: Reusable> {
    inner: Arc<PoolInner<R>>,
    policy: AcquirePolicy,
}

impl<R: Reusable> Clone for Pool<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            policy: self.policy,
        }
    }
}

impl<R: Reusable> Pool<R> {
    /// Build a pool by invoking `factory` once per slot.
    ///
    /// Construction is all-or-nothing: a factory error aborts with
    /// [`PoolError::CreationFailed`] and drops everything built so far, so a
    /// partially initialized pool is never observable.
    pub fn new<F>(config: PoolConfig, mut factory: F) -> Result<Self>
    where
        F: FnMut() -> Result<R, String>,
    {
        config.validate()?;

        let mut slots = Vec::with_capacity(config.capacity);
        let mut free = VecDeque::with_capacity(config.capacity);
        for index in 0..config.capacity {
            let resource = factory().map_err(PoolError::CreationFailed)?;
            slots.push(Slot {
                resource: Some(resource),
                state: SlotState::Free,
            });
            free.push_back(index);
        }
        debug!("pool initialized with {} resources", config.capacity);

        Ok(Self {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState {
                    slots,
                    free,
                    leased: 0,
                    retired: 0,
                    waiters: VecDeque::new(),
                    next_ticket: 0,
                    stats: PoolStats::default(),
                }),
                available: Condvar::new(),
                capacity: config.capacity,
            }),
            policy: config.policy,
        })
    }

    /// Build a pool with the given capacity and the default non-blocking
    /// policy.
    pub fn with_capacity<F>(capacity: usize, factory: F) -> Result<Self>
    where
        F: FnMut() -> Result<R, String>,
    {
        Self::new(PoolConfig::with_capacity(capacity), factory)
    }

    /// Acquire a lease according to the configured [`AcquirePolicy`].
    pub fn acquire(&self) -> Result<Lease<R>> {
        match self.policy {
            AcquirePolicy::NonBlocking => self.try_acquire(),
            AcquirePolicy::Blocking { timeout } => self.acquire_with_timeout(timeout),
        }
    }

    /// Acquire a lease without waiting.
    ///
    /// Fails with [`PoolError::Exhausted`] when nothing is free, or when
    /// blocked waiters are queued ahead (non-blocking callers do not barge
    /// past the FIFO wait queue). Free/leased bookkeeping is untouched on
    /// failure.
    pub fn try_acquire(&self) -> Result<Lease<R>> {
        let mut state = self.inner.state.lock();

        if state.waiters.is_empty() {
            if let Some((index, resource)) = state.take_free() {
                trace!("slot {} acquired, {} free", index, state.free.len());
                return Ok(Lease::new(Arc::clone(&self.inner), index, resource));
            }
        }

        state.stats.exhausted += 1;
        Err(PoolError::Exhausted)
    }

    /// Acquire a lease, waiting up to `timeout` for a release.
    ///
    /// Waiters are served in arrival order; only the front of the queue may
    /// claim a freed slot. On timeout the waiter is unlinked from the queue
    /// before [`PoolError::AcquireTimeout`] is returned, so a resource can
    /// never be matched to a caller that has already given up.
    pub fn acquire_with_timeout(&self, timeout: Duration) -> Result<Lease<R>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();

        if state.waiters.is_empty() {
            if let Some((index, resource)) = state.take_free() {
                trace!("slot {} acquired, {} free", index, state.free.len());
                return Ok(Lease::new(Arc::clone(&self.inner), index, resource));
            }
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.waiters.push_back(ticket);
        trace!("waiter {} enqueued, {} waiting", ticket, state.waiters.len());

        loop {
            if state.waiters.front() == Some(&ticket) {
                if let Some((index, resource)) = state.take_free() {
                    state.waiters.pop_front();
                    drop(state);
                    // Pass the wake-up on: several slots may have been freed.
                    self.inner.available.notify_all();
                    return Ok(Lease::new(Arc::clone(&self.inner), index, resource));
                }
            }

            if self
                .inner
                .available
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                // A release may have raced the deadline; check once more.
                if state.waiters.front() == Some(&ticket) {
                    if let Some((index, resource)) = state.take_free() {
                        state.waiters.pop_front();
                        drop(state);
                        self.inner.available.notify_all();
                        return Ok(Lease::new(Arc::clone(&self.inner), index, resource));
                    }
                }

                state.remove_waiter(ticket);
                state.stats.timed_out += 1;
                trace!("waiter {} timed out", ticket);
                drop(state);
                // The queue head moved; whoever is next must re-check.
                self.inner.available.notify_all();
                return Err(PoolError::AcquireTimeout(timeout));
            }
        }
    }

    /// Acquire, run `work`, and release on every exit path.
    ///
    /// A panic inside `work` unwinds through the lease's `Drop`, so the
    /// resource is still reset and returned. A reset failure on the normal
    /// path surfaces as [`PoolError::ResetFailed`].
    pub fn with<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut R) -> T,
    {
        let mut lease = self.acquire()?;
        let output = work(lease.get_mut());
        lease.release()?;
        Ok(output)
    }

    /// Scoped acquisition with an explicit wait budget.
    pub fn with_timeout<T, F>(&self, timeout: Duration, work: F) -> Result<T>
    where
        F: FnOnce(&mut R) -> T,
    {
        let mut lease = self.acquire_with_timeout(timeout)?;
        let output = work(lease.get_mut());
        lease.release()?;
        Ok(output)
    }

    /// Fixed number of slots the pool was built with.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of resources currently free.
    pub fn available(&self) -> usize {
        self.inner.state.lock().free.len()
    }

    /// Number of resources currently leased out.
    pub fn leased(&self) -> usize {
        self.inner.state.lock().leased
    }

    /// Number of slots permanently retired after a failed reset.
    pub fn retired(&self) -> usize {
        self.inner.state.lock().retired
    }

    /// Consistent snapshot of the free/leased/retired counts.
    pub fn occupancy(&self) -> PoolOccupancy {
        let state = self.inner.state.lock();
        PoolOccupancy {
            available: state.free.len(),
            leased: state.leased,
            retired: state.retired,
        }
    }

    /// Snapshot of the activity counters.
    pub fn stats(&self) -> PoolStats {
        self.inner.state.lock().stats.clone()
    }
}
