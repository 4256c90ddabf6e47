//! Thermal camera frame grabbers
//!
//! Two generations of the camera speak slightly different framings over
//! the same SPI link:
//!
//! - [`WordGrabber`]: 32-bit word reads, a status-row sync marker and a
//!   row-sequence check once the frame is in
//! - [`PacketGrabber`]: 164-byte packets that name their own row and
//!   flag filler lines as discard
//!
//! Both share the outer loop implemented here: take the bus lock once,
//! configure the bus, then run attempts until one yields a frame, the
//! retry policy runs out or the caller cancels.

mod packet;
mod word;

pub use packet::PacketGrabber;
pub use word::WordGrabber;

use embedded_hal::delay::DelayNs;
use koinos_core::config::CaptureConfig;
use koinos_core::retry::CancelToken;
use koinos_core::state::{ResyncReason, SyncState};
use koinos_core::traits::{CaptureError, CaptureReport};
use koinos_hal::{BitOrder, BusGuard, BusLock, ChipSelect, Mode, SpiBus, SpiConfig, WordWidth};

/// Transfer budget for one wait on the camera
#[derive(Debug, Clone, Copy)]
struct ReadWindow {
    remaining: Option<u32>,
}

impl ReadWindow {
    fn new(limit: Option<u32>) -> Self {
        Self { remaining: limit }
    }

    /// Take `cost` transfers from the budget, false once it is spent
    fn spend(&mut self, cost: u32) -> bool {
        match &mut self.remaining {
            None => true,
            Some(left) if *left >= cost => {
                *left -= cost;
                true
            }
            Some(_) => false,
        }
    }
}

/// Bus, line and pacing resources shared by both grabbers
struct Device<'a, L: ?Sized, B, CS, D> {
    lock: &'a L,
    bus: B,
    cs: CS,
    delay: D,
    config: CaptureConfig,
}

impl<'a, L, B, CS, D> Device<'a, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    fn new(
        lock: Option<&'a L>,
        bus: B,
        mut cs: CS,
        delay: D,
        config: CaptureConfig,
    ) -> Result<Self, CaptureError> {
        let Some(lock) = lock else {
            warn!("camera: no bus lock, driver disabled");
            return Err(CaptureError::BusUnavailable);
        };
        cs.deassert().map_err(|_| CaptureError::ChipSelect)?;
        info!("camera: ready");
        Ok(Self {
            lock,
            bus,
            cs,
            delay,
            config,
        })
    }

    /// Run attempts under the bus lock until one ends in [`SyncState::Valid`]
    ///
    /// `attempt` must leave the state machine terminal; anything else is
    /// treated as a lost sync.
    fn capture<C, F>(
        &mut self,
        width: WordWidth,
        cancel: &C,
        mut attempt: F,
    ) -> Result<CaptureReport, CaptureError>
    where
        C: CancelToken,
        F: FnMut(&mut Self, &mut CaptureReport) -> Result<SyncState, CaptureError>,
    {
        let _guard = BusGuard::acquire(self.lock);
        let result = self.run(width, cancel, &mut attempt);
        if result.is_err() {
            // Best effort: the line may be what failed
            let _ = self.cs.deassert();
        }
        result
    }

    fn run<C, F>(
        &mut self,
        width: WordWidth,
        cancel: &C,
        attempt: &mut F,
    ) -> Result<CaptureReport, CaptureError>
    where
        C: CancelToken,
        F: FnMut(&mut Self, &mut CaptureReport) -> Result<SyncState, CaptureError>,
    {
        self.deselect()?;
        let spi = SpiConfig {
            frequency: self.config.bus.frequency_hz,
            mode: Mode::from_index(self.config.bus.mode).unwrap_or(Mode::Mode3),
            bit_order: BitOrder::MsbFirst,
            width,
        };
        self.bus.configure(&spi).map_err(|_| CaptureError::Bus)?;

        let mut report = CaptureReport::default();
        let mut attempts = self.config.retry.attempts();

        while let Some(n) = attempts.next() {
            if cancel.is_cancelled() {
                warn!("camera: cancelled after {=u32} attempts", report.attempts);
                return Err(CaptureError::Cancelled);
            }
            report.attempts = n;
            self.delay.delay_ms(self.config.attempt_delay_ms);

            match attempt(self, &mut report)? {
                SyncState::Valid => {
                    debug!("camera: frame after {=u32} attempts", n);
                    return Ok(report);
                }
                SyncState::Resync(reason) => report.record(reason),
                _ => report.record(ResyncReason::SyncNotFound),
            }
            trace!("camera: resync, attempt {=u32}", n);
        }

        warn!("camera: gave up after {=u32} attempts", attempts.used());
        Err(CaptureError::RetriesExhausted {
            attempts: attempts.used(),
        })
    }

    fn select(&mut self) -> Result<(), CaptureError> {
        self.cs.assert().map_err(|_| CaptureError::ChipSelect)
    }

    fn deselect(&mut self) -> Result<(), CaptureError> {
        self.cs.deassert().map_err(|_| CaptureError::ChipSelect)
    }

    fn read_word(&mut self) -> Result<u32, CaptureError> {
        self.bus
            .transfer_word(WordWidth::Bits32, 0)
            .map_err(|_| CaptureError::Bus)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), CaptureError> {
        buf.fill(0);
        self.bus.transfer_in_place(buf).map_err(|_| CaptureError::Bus)
    }
}
