//! Frame synchronization state machine
//!
//! Tracks where a capture attempt stands with respect to the camera's
//! stream. Every attempt starts a fresh instance; the grabbers feed
//! it events and act on the resulting state.

pub mod events;
pub mod machine;

pub use events::SyncEvent;
pub use machine::{ResyncReason, SyncState};
