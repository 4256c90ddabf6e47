//! Retry bounds and cancellation
//!
//! The camera protocol retries until it gets a good frame. Left alone that
//! can hold the shared bus forever, so every capture runs its attempts
//! through a [`RetryPolicy`] and checks a [`CancelToken`] before each one.

use core::num::NonZeroU32;
use core::sync::atomic::Ordering;

use portable_atomic::AtomicBool;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attempts made by a capture call unless configured otherwise
///
/// Each attempt can wait a full read window plus the attempt delay, so
/// at the legacy pacing a silent camera gives the bus back within ten
/// seconds.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// How many capture attempts may run inside one locked call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RetryPolicy {
    /// Upper bound on attempts (`None` = retry forever)
    pub max_attempts: Option<NonZeroU32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::bounded(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Retry until a frame is captured
    ///
    /// A camera that never syncs then holds the shared bus forever.
    pub const fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Give up after `attempts` attempts (at least one is always made)
    pub const fn bounded(attempts: u32) -> Self {
        Self {
            max_attempts: match NonZeroU32::new(attempts) {
                Some(n) => Some(n),
                None => Some(NonZeroU32::MIN),
            },
        }
    }

    /// Iterator yielding 1-based attempt numbers
    pub fn attempts(&self) -> Attempts {
        Attempts {
            next: 1,
            limit: self.max_attempts,
        }
    }
}

/// Bounded (or not) sequence of attempt numbers
#[derive(Debug, Clone)]
pub struct Attempts {
    next: u32,
    limit: Option<NonZeroU32>,
}

impl Attempts {
    /// Number of attempts handed out so far
    pub fn used(&self) -> u32 {
        self.next - 1
    }
}

impl Iterator for Attempts {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if let Some(limit) = self.limit {
            if self.next > limit.get() {
                return None;
            }
        }
        let attempt = self.next;
        // Saturate rather than wrap on absurdly long unbounded runs
        self.next = self.next.saturating_add(1);
        Some(attempt)
    }
}

/// Checked at every retry boundary, never mid-transfer
pub trait CancelToken {
    /// Check whether the caller asked the capture to stop
    fn is_cancelled(&self) -> bool;
}

/// Token that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: CancelToken + ?Sized> CancelToken for &T {
    fn is_cancelled(&self) -> bool {
        T::is_cancelled(self)
    }
}

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed point
    fn now_ms(&self) -> u64;
}

/// Cancels once a clock passes a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct Deadline<C> {
    clock: C,
    expires_at_ms: u64,
}

impl<C: Clock> Deadline<C> {
    /// Deadline `timeout_ms` from now
    pub fn after(clock: C, timeout_ms: u64) -> Self {
        let expires_at_ms = clock.now_ms().saturating_add(timeout_ms);
        Self {
            clock,
            expires_at_ms,
        }
    }

    /// Milliseconds left before expiry
    pub fn remaining_ms(&self) -> u64 {
        self.expires_at_ms.saturating_sub(self.clock.now_ms())
    }
}

impl<C: Clock> CancelToken for Deadline<C> {
    fn is_cancelled(&self) -> bool {
        self.clock.now_ms() >= self.expires_at_ms
    }
}
