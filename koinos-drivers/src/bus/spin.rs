//! Spinning bus lock
//!
//! Busy-waits on a single atomic flag. Good enough when the only
//! contenders are the camera and display tasks and hold times are short
//! compared to a scheduler tick; an RTOS mutex can implement
//! [`BusLock`] directly instead.

use core::sync::atomic::Ordering;

use koinos_hal::BusLock;
use portable_atomic::AtomicBool;

/// Test-and-test-and-set lock guarding one SPI bus
#[derive(Debug, Default)]
pub struct SpinBusLock {
    locked: AtomicBool,
}

impl SpinBusLock {
    /// Create an unlocked bus lock
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Take the lock if nobody holds it
    pub fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Check whether some consumer currently owns the bus
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl BusLock for SpinBusLock {
    fn acquire(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Spin on a plain load so contenders don't hammer the cache line
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
    }

    fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }
}
