//! The reset contract for pooled resources.

/// A resource that can be parked in a pool and handed out repeatedly.
///
/// The pool guarantees exclusivity through its own bookkeeping, so
/// implementations are free to hold non-`Sync` state. `Send` is required
/// because a leased resource may be released from a different thread than
/// the one that acquired it.
pub trait Reusable: Send + 'static {
    /// Scrub all caller-visible state left by the previous lease.
    ///
    /// Runs on every release, before the resource becomes acquirable again.
    /// A stale authentication token or an unflushed buffer surviving this
    /// call would be handed to the next caller, so implementations must
    /// return `false` whenever the resource cannot be brought back to a
    /// clean state; the pool then retires it instead of reusing it.
    fn reset(&mut self) -> bool;
}

impl<T: Send + 'static> Reusable for Vec<T> {
    /// Clears the contents while keeping the allocation, which is the point
    /// of pooling a buffer.
    fn reset(&mut self) -> bool {
        self.clear();
        true
    }
}

impl Reusable for String {
    fn reset(&mut self) -> bool {
        self.clear();
        true
    }
}
