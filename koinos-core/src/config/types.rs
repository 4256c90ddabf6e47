//! Configuration type definitions

use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Line number reached through dedicated registers instead of the GPIO matrix
pub const REGISTER_MAPPED_LINE: u8 = 16;

/// Default bound on rows/packets read while waiting on the camera
pub const DEFAULT_READ_WINDOW_ROWS: u32 = 1024;

/// Bus clock and mode for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusSettings {
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// SPI mode number (0-3)
    pub mode: u8,
}

impl BusSettings {
    /// Camera bus: 20 MHz, mode 3
    pub const CAMERA: Self = Self {
        frequency_hz: 20_000_000,
        mode: 3,
    };

    /// Memory display bus: 2 MHz, mode 0
    pub const DISPLAY: Self = Self {
        frequency_hz: 2_000_000,
        mode: 0,
    };
}

/// Chip-select line configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChipSelectConfig {
    /// GPIO line number
    pub line: u8,
    /// Device is selected when the line is low
    pub active_low: bool,
}

impl ChipSelectConfig {
    /// Line that is driven high to select
    pub const fn active_high(line: u8) -> Self {
        Self {
            line,
            active_low: false,
        }
    }

    /// Line that is driven low to select
    pub const fn active_low(line: u8) -> Self {
        Self {
            line,
            active_low: true,
        }
    }

    /// Check whether this line needs the register-mapped implementation
    pub const fn is_register_mapped(&self) -> bool {
        self.line == REGISTER_MAPPED_LINE
    }
}

/// Thermal camera capture configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    /// Attempt bound inside one locked call
    pub retry: RetryPolicy,
    /// Rows (or packets) read while waiting on the camera before an
    /// attempt is abandoned (`None` = wait forever)
    pub read_window_rows: Option<u32>,
    /// Pause before every attempt
    pub attempt_delay_ms: u32,
    /// Pause after chip-select is released to let the camera settle
    pub settle_delay_ms: u32,
    /// Rows read and dropped after the frame to keep the stream moving
    ///
    /// Word-synchronized grabber only. The packet grabber stops at the
    /// last image line and ignores this field.
    pub trailing_rows: u8,
    /// Bus clock and mode
    pub bus: BusSettings,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::word_sync()
    }
}

impl CaptureConfig {
    /// Word-synchronized grabber defaults
    pub const fn word_sync() -> Self {
        Self {
            retry: RetryPolicy::bounded(DEFAULT_MAX_ATTEMPTS),
            read_window_rows: Some(DEFAULT_READ_WINDOW_ROWS),
            attempt_delay_ms: 1000,
            settle_delay_ms: 200,
            trailing_rows: 1,
            bus: BusSettings::CAMERA,
        }
    }

    /// Byte-packet grabber defaults
    pub const fn packet_sync() -> Self {
        Self {
            retry: RetryPolicy::bounded(DEFAULT_MAX_ATTEMPTS),
            read_window_rows: Some(DEFAULT_READ_WINDOW_ROWS),
            attempt_delay_ms: 0,
            settle_delay_ms: 185,
            trailing_rows: 0,
            bus: BusSettings::CAMERA,
        }
    }

    /// Exact legacy behavior: no retry bound, no read window
    ///
    /// A camera that never syncs keeps the shared bus locked for good.
    pub const fn legacy(self) -> Self {
        Self {
            retry: RetryPolicy::unbounded(),
            read_window_rows: None,
            ..self
        }
    }

    /// Same configuration with a different retry policy
    pub const fn with_retry(self, retry: RetryPolicy) -> Self {
        Self { retry, ..self }
    }

    /// Same configuration with a different read window
    pub const fn with_read_window(self, rows: Option<u32>) -> Self {
        Self {
            read_window_rows: rows,
            ..self
        }
    }

    /// Same configuration without pacing delays (host tests, simulators)
    pub const fn without_delays(self) -> Self {
        Self {
            attempt_delay_ms: 0,
            settle_delay_ms: 0,
            ..self
        }
    }
}

/// Display rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Deg0,
    /// 90° clockwise
    Deg90,
    /// Upside down
    Deg180,
    /// 270° clockwise
    Deg270,
}

impl Rotation {
    /// Rotation from its quarter-turn index (wraps modulo 4)
    pub const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }
}

/// Memory display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Chip-select line (the display selects on high)
    pub cs: ChipSelectConfig,
    /// Drawing rotation
    pub rotation: Rotation,
    /// Bus clock and mode
    pub bus: BusSettings,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cs: ChipSelectConfig::active_high(15),
            rotation: Rotation::Deg0,
            bus: BusSettings::DISPLAY,
        }
    }
}
