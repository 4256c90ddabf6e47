//! Synchronization states
//!
//! ```text
//! Unsynced ──MarkerFound──▶ SyncCandidate ──DataStarted──▶ Capturing
//!    │  ▲                        │ ▲  StatusRow               │
//!    │  │                        └─┘                          ├─FrameComplete──▶ Valid
//!    │  └────────Restart──────── Resync ◀──SequenceMismatch───┘
//!    └──────────WindowExhausted───▲
//! ```

use super::events::SyncEvent;

/// Why an attempt was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResyncReason {
    /// No frame-start marker (or data packet) within the read window
    SyncNotFound,
    /// A completed frame's row sequence did not match row positions
    SequenceMismatch {
        /// Row that failed
        row: u8,
        /// Sequence number it carried
        found: u8,
    },
}

/// Synchronization states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// Scanning for the frame-sync marker
    #[default]
    Unsynced,
    /// Marker seen, consuming status rows
    SyncCandidate,
    /// Reading image rows into the caller's buffer
    Capturing,
    /// A structurally valid frame is in the buffer
    Valid,
    /// Attempt abandoned; the next one starts from scratch
    Resync(ResyncReason),
}

impl SyncState {
    /// Check whether image data may be written to the caller's buffer
    pub fn writes_allowed(&self) -> bool {
        matches!(self, SyncState::Capturing)
    }

    /// Check whether the attempt is over (either way)
    pub fn is_terminal(&self) -> bool {
        matches!(self, SyncState::Valid | SyncState::Resync(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: SyncEvent) -> Self {
        use SyncEvent::*;
        use SyncState::*;

        match (self, event) {
            // Scanning
            (Unsynced, MarkerFound) => SyncCandidate,
            // Packet streams have no status region
            (Unsynced, DataStarted) => Capturing,
            (Unsynced, WindowExhausted) => Resync(ResyncReason::SyncNotFound),

            // Status region
            (SyncCandidate, StatusRow) => SyncCandidate,
            (SyncCandidate, DataStarted) => Capturing,
            (SyncCandidate, WindowExhausted) => Resync(ResyncReason::SyncNotFound),

            // Image rows
            (Capturing, FrameComplete) => Valid,
            (Capturing, SequenceMismatch(m)) => Resync(ResyncReason::SequenceMismatch {
                row: m.row,
                found: m.found,
            }),
            (Capturing, WindowExhausted) => Resync(ResyncReason::SyncNotFound),

            // Retry
            (Resync(_), Restart) => Unsynced,

            // Default: stay in current state
            _ => self,
        }
    }
}
