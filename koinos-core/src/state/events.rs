//! Events that drive synchronization

use crate::frame::SequenceMismatch;

/// Observations made while reading the camera stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncEvent {
    /// A word carrying the status sentinel was seen
    MarkerFound,
    /// Another complete status row was read
    StatusRow,
    /// The first image row/packet arrived
    DataStarted,
    /// All rows of the frame were read
    FrameComplete,
    /// Post-capture validation rejected a row
    SequenceMismatch(SequenceMismatch),
    /// The read window ran out while waiting on the camera
    WindowExhausted,
    /// A new attempt begins
    Restart,
}
