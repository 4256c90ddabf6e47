//! Bus arbitration
//!
//! The host owns the mutex that serializes access to the shared bus. The
//! drivers only borrow it and wrap every transaction sequence in a
//! [`BusGuard`], so the lock is released on every exit path.

/// Host-provided mutual exclusion for the shared bus
///
/// `acquire` blocks until the caller owns the bus. Every `acquire` is
/// paired with exactly one `release` by [`BusGuard`].
pub trait BusLock {
    /// Block until the bus is owned by the caller
    fn acquire(&self);

    /// Give the bus back
    fn release(&self);
}

impl<T: BusLock + ?Sized> BusLock for &T {
    fn acquire(&self) {
        T::acquire(self)
    }

    fn release(&self) {
        T::release(self)
    }
}

/// Holds the bus lock until dropped
#[must_use = "the bus is released as soon as the guard is dropped"]
pub struct BusGuard<'a, L: BusLock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: BusLock + ?Sized> BusGuard<'a, L> {
    /// Acquire `lock`, blocking until it is available
    pub fn acquire(lock: &'a L) -> Self {
        lock.acquire();
        Self { lock }
    }
}

impl<L: BusLock + ?Sized> Drop for BusGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
