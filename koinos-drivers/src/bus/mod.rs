//! Shared bus plumbing
//!
//! - [`SpinBusLock`]: minimal [`BusLock`](koinos_hal::BusLock) for hosts
//!   without an RTOS mutex
//! - [`EhSpi`]: runs the word-oriented [`SpiBus`](koinos_hal::SpiBus) on
//!   top of any `embedded-hal` byte bus

mod spi;
mod spin;

pub use spi::EhSpi;
pub use spin::SpinBusLock;
