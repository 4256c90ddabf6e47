//! Koinos Hardware Abstraction Layer
//!
//! This crate defines the capabilities the Koinos drivers consume. A host
//! platform (ESP8266, RP2040, a Linux spidev, a test double) implements
//! them once and both peripheral drivers share the result.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  koinos-drivers      │     │  koinos-display      │
//! │  (thermal camera)    │     │  (memory LCD)        │
//! └──────────────────────┘     └──────────────────────┘
//!            │                            │
//!            └─────────────┬──────────────┘
//!                          ▼
//! ┌─────────────────────────────────────────┐
//! │  koinos-hal (this crate - traits)       │
//! │  SpiBus · ChipSelect · BusLock          │
//! └─────────────────────────────────────────┘
//!                          │
//!                          ▼
//!            one physical SPI bus + host mutex
//! ```
//!
//! # Traits
//!
//! - [`spi::SpiBus`] - Word-oriented transfers on the shared bus
//! - [`gpio::ChipSelect`] - Enable line of one peripheral
//! - [`gpio::RegisterBank`] - Raw register access for register-mapped lines
//! - [`lock::BusLock`] - Host-provided mutual exclusion for the bus

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod lock;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{ChipSelect, GpioRegister, RegisterBank};
pub use lock::{BusGuard, BusLock};
pub use spi::{BitOrder, Mode, SpiBus, SpiConfig, WordWidth};
