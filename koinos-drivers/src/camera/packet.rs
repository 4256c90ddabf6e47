//! Packet-synchronized grabber
//!
//! Newer cameras frame every line as a 164-byte packet that names its own
//! row. Filler lines carry `0x0F` in the header's low nibble and are
//! skipped. Since each packet says where it goes there is no sequence
//! check at the end: a line lost after sync stays zero.

use embedded_hal::delay::DelayNs;
use koinos_core::config::CaptureConfig;
use koinos_core::frame::{Packet, PixelFrame, LAST_ROW, PACKET_LEN};
use koinos_core::retry::CancelToken;
use koinos_core::state::{SyncEvent, SyncState};
use koinos_core::traits::{CaptureError, CaptureReport, FrameGrabber};
use koinos_hal::{BusLock, ChipSelect, SpiBus, WordWidth};

use super::{Device, ReadWindow};

/// Frame grabber for packet-synchronized cameras
pub struct PacketGrabber<'a, L: ?Sized, B, CS, D> {
    device: Device<'a, L, B, CS, D>,
}

impl<'a, L, B, CS, D> PacketGrabber<'a, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    /// Create a grabber sharing `lock` with the other bus consumers
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

impl<L, B, CS, D> FrameGrabber for PacketGrabber<'_, L, B, CS, D>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    type Frame = PixelFrame;

    fn capture_with<C: CancelToken>(
        &mut self,
        frame: &mut PixelFrame,
        cancel: &C,
    ) -> Result<CaptureReport, CaptureError> {
        self.device
            .capture(WordWidth::Bits8, cancel, |dev, report| {
                dev.packet_attempt(frame, report)
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
    fn packet_attempt(
        &mut self,
        frame: &mut PixelFrame,
        report: &mut CaptureReport,
    ) -> Result<SyncState, CaptureError> {
        let mut window = ReadWindow::new(self.config.read_window_rows);
        let mut buf = [0u8; PACKET_LEN];
        // Row named by the last data packet written
        let mut last_row: Option<u8> = None;
        let mut state = SyncState::default();

        frame.clear();

        // Bouncing the line restarts the camera's packet stream
        self.deselect()?;
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.select()?;

        while !matches!(last_row, Some(row) if row >= LAST_ROW) {
            if !window.spend(1) {
                self.deselect()?;
                return Ok(state.transition(SyncEvent::WindowExhausted));
            }
            self.read_bytes(&mut buf)?;

            let packet = Packet::new(&buf);
            if packet.is_discard() {
                report.discarded += 1;
                continue;
            }
            if !state.writes_allowed() {
                trace!("camera: stream starts at row {=u8}", packet.sequence());
                state = state.transition(SyncEvent::DataStarted);
            }

            match frame.write_packet(&packet) {
                Ok(row) => last_row = Some(row),
                Err(_) => report.out_of_frame += 1,
            }
        }

        self.deselect()?;
        Ok(state.transition(SyncEvent::FrameComplete))
    }
}
