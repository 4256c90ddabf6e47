//! Word-synchronized grabber
//!
//! The camera streams 41-word rows. Rows whose first word has its low 28
//! bits set are status rows; the first row that doesn't is image row 0.
//! Each attempt:
//!
//! 1. Hold the line and scan word by word for a status-row marker
//! 2. Finish that row, release the line and let the camera settle
//! 3. Read whole rows until the status region ends
//! 4. Read the remaining image rows straight into the frame, then the
//!    trailing rows that keep the stream moving
//! 5. Check every row's sequence field against its position

use embedded_hal::delay::DelayNs;
use koinos_core::config::CaptureConfig;
use koinos_core::frame::word::{is_status_word, ROW_WORDS};
use koinos_core::frame::{WordFrame, WordRow};
use koinos_core::retry::CancelToken;
use koinos_core::state::{SyncEvent, SyncState};
use koinos_core::traits::{CaptureError, CaptureReport, FrameGrabber};
use koinos_hal::{BusLock, ChipSelect, SpiBus, WordWidth};

use super::{Device, ReadWindow};

/// Frame grabber for word-synchronized cameras
pub struct WordGrabber<'a, L: ?Sized, B, CS, D> {
    device: Device<'a, L, B, CS, D>,
}

impl<'a, L, B, CS, D> WordGrabber<'a, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    /// Create a grabber sharing `lock` with the other bus consumers
    ///
    /// Fails with [`CaptureError::BusUnavailable`] when no lock is given.
    /// On success the camera is deselected.
    pub fn new(
        lock: Option<&'a L>,
        bus: B,
        cs: CS,
        delay: D,
        config: CaptureConfig,
    ) -> Result<Self, CaptureError> {
        Ok(Self {
            device: Device::new(lock, bus, cs, delay, config)?,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.device.config
    }

    /// Give back the bus, chip-select and delay
    pub fn release(self) -> (B, CS, D) {
        (self.device.bus, self.device.cs, self.device.delay)
    }
}

impl<L, B, CS, D> FrameGrabber for WordGrabber<'_, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    type Frame = WordFrame;

    fn capture_with<C: CancelToken>(
        &mut self,
        frame: &mut WordFrame,
        cancel: &C,
    ) -> Result<CaptureReport, CaptureError> {
        self.device
            .capture(WordWidth::Bits32, cancel, |dev, report| {
                dev.word_attempt(frame, report)
            })
    }
}

impl<L, B, CS, D> Device<'_, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    /// One pass of the word protocol, ending in a terminal state
    fn word_attempt(
        &mut self,
        frame: &mut WordFrame,
        report: &mut CaptureReport,
    ) -> Result<SyncState, CaptureError> {
        let mut window = ReadWindow::new(
            self.config
                .read_window_rows
                .map(|rows| rows.saturating_mul(ROW_WORDS as u32)),
        );
        let mut scratch: WordRow = [0; ROW_WORDS];
        let mut state = SyncState::default();

        self.select()?;
        loop {
            if !window.spend(1) {
                self.deselect()?;
                return Ok(state.transition(SyncEvent::WindowExhausted));
            }
            let word = self.read_word()?;
            if is_status_word(word) {
                scratch[0] = word;
                break;
            }
        }
        state = state.transition(SyncEvent::MarkerFound);
        trace!("camera: marker");

        for word in scratch[1..].iter_mut() {
            *word = self.read_word()?;
        }
        self.deselect()?;
        self.delay.delay_ms(self.config.settle_delay_ms);

        loop {
            if !window.spend(ROW_WORDS as u32) {
                return Ok(state.transition(SyncEvent::WindowExhausted));
            }
            self.read_row(&mut scratch)?;
            if !is_status_word(scratch[0]) {
                break;
            }
            report.status_rows += 1;
            state = state.transition(SyncEvent::StatusRow);
        }
        state = state.transition(SyncEvent::DataStarted);

        let rows = frame.rows_mut();
        rows[0] = scratch;
        for row in rows[1..].iter_mut() {
            self.read_row(row)?;
        }
        for _ in 0..self.config.trailing_rows {
            self.read_row(&mut scratch)?;
        }

        Ok(match frame.validate() {
            Ok(()) => state.transition(SyncEvent::FrameComplete),
            Err(mismatch) => {
                debug!(
                    "camera: row {=u8} carried sequence {=u8}",
                    mismatch.row,
                    mismatch.found
                );
                state.transition(SyncEvent::SequenceMismatch(mismatch))
            }
        })
    }

    /// Read one row as its own chip-select transaction
    fn read_row(&mut self, row: &mut WordRow) -> Result<(), CaptureError> {
        self.select()?;
        for word in row.iter_mut() {
            *word = self.read_word()?;
        }
        self.deselect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::*;
    use super::*;
    use koinos_core::frame::FRAME_ROWS;
    use koinos_core::retry::RetryPolicy;
    use koinos_core::state::ResyncReason;
    use koinos_hal::{BitOrder, Mode};

    fn status_row() -> WordRow {
        [0xFFFF_FFFF; ROW_WORDS]
    }

    fn image_row(seq: u8) -> WordRow {
        let mut row = [0u32; ROW_WORDS];
        row[0] = u32::from(seq) << 16;
        for (i, word) in row[1..].iter_mut().enumerate() {
            *word = (u32::from(seq) << 8) | i as u32;
        }
        row
    }

    fn stream(status_rows: usize, seqs: impl IntoIterator<Item = u8>) -> Vec<u32> {
        let mut words = Vec::new();
        for _ in 0..status_rows {
            words.extend_from_slice(&status_row());
        }
        for seq in seqs {
            words.extend_from_slice(&image_row(seq));
        }
        words
    }

    fn good_frame() -> Vec<u32> {
        // 60 image rows plus the trailing row
        stream(3, 0..=60)
    }

    fn config() -> CaptureConfig {
        CaptureConfig::word_sync()
            .without_delays()
            .with_retry(RetryPolicy::bounded(5))
            .with_read_window(Some(16))
    }

    #[test]
    fn test_captures_after_status_rows() {
        let lock = CountingLock::default();
        let bus = ScriptBus {
            words: good_frame().into(),
            ..Default::default()
        };
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config())
                .unwrap();

        let mut frame = WordFrame::new();
        let report = grabber.capture(&mut frame).unwrap();

        assert!(frame.sequence_numbers().eq(0..FRAME_ROWS as u8));
        assert_eq!(report.attempts, 1);
        // The marker row itself is not counted
        assert_eq!(report.status_rows, 2);
        assert_eq!(lock.acquired.get(), 1);
        assert_eq!(lock.released.get(), 1);

        let (bus, cs, _) = grabber.release();
        assert!(!cs.active);
        assert!(bus.words.is_empty());
        assert_eq!(bus.configs.len(), 1);
        assert_eq!(bus.configs[0].mode, Mode::Mode3);
        assert_eq!(bus.configs[0].frequency, 20_000_000);
        assert_eq!(bus.configs[0].bit_order, BitOrder::MsbFirst);
        assert_eq!(bus.configs[0].width, WordWidth::Bits32);
    }

    #[test]
    fn test_one_transaction_per_row() {
        let lock = CountingLock::default();
        let bus = ScriptBus {
            words: good_frame().into(),
            ..Default::default()
        };
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config())
                .unwrap();

        grabber.capture(&mut WordFrame::new()).unwrap();

        let (_, cs, _) = grabber.release();
        // Scan, two status rows, 60 image rows, one trailing row
        assert_eq!(cs.asserts, 1 + 2 + 60 + 1);
    }

    #[test]
    fn test_mismatch_restarts_capture() {
        let lock = CountingLock::default();
        let mut seqs: Vec<u8> = (0..=60).collect();
        seqs[37] = 99;
        let mut words = stream(2, seqs);
        words.extend(good_frame());

        let bus = ScriptBus {
            words: words.into(),
            ..Default::default()
        };
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config())
                .unwrap();

        let mut frame = WordFrame::new();
        let report = grabber.capture(&mut frame).unwrap();

        assert!(frame.validate().is_ok());
        assert_eq!(report.attempts, 2);
        assert_eq!(report.sequence_mismatches, 1);
        assert_eq!(
            report.last_resync,
            Some(ResyncReason::SequenceMismatch { row: 37, found: 99 })
        );
        // Restarts happen without letting go of the bus
        assert_eq!(lock.acquired.get(), 1);
        assert_eq!(lock.released.get(), 1);
    }

    #[test]
    fn test_missing_marker_never_touches_frame() {
        let lock = CountingLock::default();
        let config = config()
            .with_retry(RetryPolicy::bounded(3))
            .with_read_window(Some(2));
        let mut grabber = WordGrabber::new(
            Some(&lock),
            ScriptBus::default(),
            Line::default(),
            NoDelay::default(),
            config,
        )
        .unwrap();

        let mut frame = WordFrame::new();
        let result = grabber.capture(&mut frame);

        assert_eq!(result, Err(CaptureError::RetriesExhausted { attempts: 3 }));
        assert!(frame.is_zeroed());
        let (bus, cs, _) = grabber.release();
        assert_eq!(bus.transfers, 3 * 2 * ROW_WORDS);
        assert!(!cs.active);
        assert_eq!(lock.released.get(), 1);
    }

    #[test]
    fn test_endless_status_rows_exhaust_window() {
        let lock = CountingLock::default();
        let config = config()
            .with_retry(RetryPolicy::bounded(1))
            .with_read_window(Some(4));
        let bus = ScriptBus {
            words: stream(100, 0..0).into(),
            ..Default::default()
        };
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config)
                .unwrap();

        let result = grabber.capture(&mut WordFrame::new());

        assert_eq!(result, Err(CaptureError::RetriesExhausted { attempts: 1 }));
    }

    #[test]
    fn test_bus_error_releases_everything() {
        let lock = CountingLock::default();
        let bus = ScriptBus {
            words: good_frame().into(),
            fail_after: Some(100),
            ..Default::default()
        };
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config())
                .unwrap();

        let result = grabber.capture(&mut WordFrame::new());

        assert_eq!(result, Err(CaptureError::Bus));
        assert_eq!(lock.acquired.get(), 1);
        assert_eq!(lock.released.get(), 1);
        let (_, cs, _) = grabber.release();
        assert!(!cs.active);
    }

    #[test]
    fn test_pacing_delays() {
        let lock = CountingLock::default();
        let bus = ScriptBus {
            words: good_frame().into(),
            ..Default::default()
        };
        let config = CaptureConfig::word_sync().with_retry(RetryPolicy::bounded(1));
        let mut grabber =
            WordGrabber::new(Some(&lock), bus, Line::default(), NoDelay::default(), config)
                .unwrap();

        grabber.capture(&mut WordFrame::new()).unwrap();

        let (_, _, delay) = grabber.release();
        assert_eq!(delay.total_ms, 1000 + 200);
    }
}
