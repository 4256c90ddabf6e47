//! Board-agnostic core logic for the Koinos shared-bus drivers
//!
//! This crate contains everything about the thermal camera protocol that
//! does not touch hardware:
//!
//! - Frame and packet layouts, sync-marker tests, payload extraction
//! - Sequence validation for word-synchronized frames
//! - Synchronization state machine
//! - Retry bounds and cancellation
//! - Capture errors, reports and the grabber trait
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod retry;
pub mod state;
pub mod traits;
