//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in koinos-hal and koinos-core:
//!
//! - Bus plumbing (spin bus lock, embedded-hal SPI adapter)
//! - Chip-select lines (GPIO pin, register-mapped GPIO16)
//! - Thermal camera frame grabbers (word-synchronized, packet-synchronized)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod camera;
pub mod select;
