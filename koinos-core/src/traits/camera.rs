//! Frame grabber trait for the thermal camera

use crate::retry::{CancelToken, NeverCancel};
use crate::state::ResyncReason;

/// Errors surfaced by a capture call
///
/// Synchronization failures are retried internally and only show up in
/// [`CaptureReport`]; these are the ways a call can end without a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// No bus lock was supplied at initialization; the driver is unusable
    BusUnavailable,
    /// The retry policy ran out before a valid frame arrived
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
    },
    /// The cancel token fired at a retry boundary
    Cancelled,
    /// The bus transport reported an error
    Bus,
    /// The chip-select line reported an error
    ChipSelect,
}

/// What happened during a successful (or abandoned) capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureReport {
    /// Attempts made, including the successful one
    pub attempts: u32,
    /// Attempts abandoned because the read window ran out
    pub sync_failures: u32,
    /// Attempts abandoned by sequence validation
    pub sequence_mismatches: u32,
    /// Status rows consumed before image data started
    pub status_rows: u32,
    /// Discard packets skipped
    pub discarded: u32,
    /// Data packets ignored because their line was outside the frame
    pub out_of_frame: u32,
    /// Reason the last abandoned attempt was dropped
    pub last_resync: Option<ResyncReason>,
}

impl CaptureReport {
    /// Record an abandoned attempt
    pub fn record(&mut self, reason: ResyncReason) {
        match reason {
            ResyncReason::SyncNotFound => self.sync_failures += 1,
            ResyncReason::SequenceMismatch { .. } => self.sequence_mismatches += 1,
        }
        self.last_resync = Some(reason);
    }

    /// Attempts that did not produce a frame
    pub fn resyncs(&self) -> u32 {
        self.sync_failures + self.sequence_mismatches
    }
}

/// A driver that fills a caller-owned frame buffer
///
/// Implementations hold the shared bus lock for the whole call, including
/// every internal resynchronization.
pub trait FrameGrabber {
    /// Frame buffer type written by this grabber
    type Frame;

    /// Capture one frame, checking `cancel` before every attempt
    fn capture_with<C: CancelToken>(
        &mut self,
        frame: &mut Self::Frame,
        cancel: &C,
    ) -> Result<CaptureReport, CaptureError>;

    /// Capture one frame, bounded only by the configured retry policy
    fn capture(&mut self, frame: &mut Self::Frame) -> Result<CaptureReport, CaptureError> {
        self.capture_with(frame, &NeverCancel)
    }
}
