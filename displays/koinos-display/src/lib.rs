//! Memory display support for Koinos
//!
//! This crate provides:
//! - `DisplayBackend` trait for pixel-addressed monochrome panels
//! - `SharpMemoryDisplay`, a driver for the 96x96 Sharp memory LCD
//!
//! # Architecture
//!
//! The display shares its SPI bus with the thermal camera. Every command
//! runs as one transaction under the host's bus lock, so a refresh never
//! lands in the middle of a frame capture and vice versa.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod sharp;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use sharp::{SharpMemoryDisplay, HEIGHT, WIDTH};
