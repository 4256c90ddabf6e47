//! Sharp memory LCD (96x96)
//!
//! The panel keeps its image without refresh traffic. Each update sends
//! a command byte, then one packet per line:
//!
//! ```text
//! [cmd] ([line addr] [12 data bytes] [0x00]) x 96 [0x00]
//! ```
//!
//! The command byte goes out MSB first; everything after it LSB first.
//! The bus is configured LSB-first and the command is bit-reversed before
//! sending. The VCOM bit must alternate between commands to keep the
//! liquid crystal from taking a DC bias.

use koinos_core::config::{DisplayConfig, Rotation};
use koinos_hal::{BitOrder, BusGuard, BusLock, ChipSelect, Mode, SpiBus, SpiConfig, WordWidth};

use crate::backend::{DisplayBackend, DisplayError};

/// Panel width in pixels
pub const WIDTH: u16 = 96;

/// Panel height in pixels
pub const HEIGHT: u16 = 96;

/// Bytes in one line of the frame buffer
pub const LINE_BYTES: usize = WIDTH as usize / 8;

/// Frame buffer size in bytes
pub const BUFFER_LEN: usize = LINE_BYTES * HEIGHT as usize;

/// Address, data and trailer of one line on the wire
const LINE_PACKET_LEN: usize = LINE_BYTES + 2;

/// Command bits
pub mod cmd {
    /// Write lines
    pub const WRITE: u8 = 0x80;
    /// VCOM polarity
    pub const VCOM: u8 = 0x40;
    /// Clear the panel memory
    pub const CLEAR: u8 = 0x20;
}

/// Sharp memory display on a shared SPI bus
pub struct SharpMemoryDisplay<'a, L: ?Sized, B, CS> {
    lock: &'a L,
    bus: B,
    cs: CS,
    config: DisplayConfig,
    buffer: [u8; BUFFER_LEN],
    vcom: u8,
}

impl<'a, L, B, CS> SharpMemoryDisplay<'a, L, B, CS>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
{
    /// Create a display sharing `lock` with the camera
    ///
    /// Fails with [`DisplayError::BusUnavailable`] when no lock is given.
    /// On success the display is deselected.
    pub fn new(
        lock: Option<&'a L>,
        bus: B,
        mut cs: CS,
        config: DisplayConfig,
    ) -> Result<Self, DisplayError> {
        let lock = lock.ok_or(DisplayError::BusUnavailable)?;
        cs.deassert().map_err(|_| DisplayError::ChipSelect)?;
        Ok(Self {
            lock,
            bus,
            cs,
            config,
            buffer: [0; BUFFER_LEN],
            vcom: 0,
        })
    }

    /// Change the drawing rotation
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.config.rotation = rotation;
    }

    /// Current drawing rotation
    pub fn rotation(&self) -> Rotation {
        self.config.rotation
    }

    /// Raw frame buffer, one bit per pixel, LSB is the leftmost pixel
    pub fn buffer(&self) -> &[u8; BUFFER_LEN] {
        &self.buffer
    }

    /// VCOM bit the next command will carry
    pub fn vcom(&self) -> u8 {
        self.vcom
    }

    /// Give back the bus and chip-select
    pub fn release(self) -> (B, CS) {
        (self.bus, self.cs)
    }

    /// Blank the panel and fill the buffer with set bits
    ///
    /// Uses the clear command instead of a full refresh.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.buffer.fill(0xFF);
        let command = (self.vcom | cmd::CLEAR).reverse_bits();
        self.transaction(|bus, _| {
            bus.write(&[command, 0x00])
                .map_err(|_| DisplayError::Communication)
        })?;
        self.toggle_vcom();
        Ok(())
    }

    /// Send the whole buffer to the panel
    pub fn refresh(&mut self) -> Result<(), DisplayError> {
        let command = (cmd::WRITE | self.vcom).reverse_bits();
        self.transaction(|bus, buffer| {
            bus.write(&[command])
                .map_err(|_| DisplayError::Communication)?;
            for (index, data) in buffer.chunks_exact(LINE_BYTES).enumerate() {
                // Line addresses start at 1
                let line = line_packet(index as u8 + 1, data);
                bus.write(&line).map_err(|_| DisplayError::Communication)?;
            }
            bus.write(&[0x00]).map_err(|_| DisplayError::Communication)
        })?;
        self.toggle_vcom();
        Ok(())
    }

    fn toggle_vcom(&mut self) {
        self.vcom ^= cmd::VCOM;
    }

    /// Run `f` as one selected transaction under the bus lock
    fn transaction<F>(&mut self, f: F) -> Result<(), DisplayError>
    where
        F: FnOnce(&mut B, &[u8; BUFFER_LEN]) -> Result<(), DisplayError>,
    {
        let _guard = BusGuard::acquire(self.lock);

        let spi = SpiConfig {
            frequency: self.config.bus.frequency_hz,
            mode: Mode::from_index(self.config.bus.mode).unwrap_or(Mode::Mode0),
            bit_order: BitOrder::LsbFirst,
            width: WordWidth::Bits8,
        };
        self.bus
            .configure(&spi)
            .map_err(|_| DisplayError::Communication)?;

        self.cs.assert().map_err(|_| DisplayError::ChipSelect)?;
        let result = f(&mut self.bus, &self.buffer);
        let released = self.cs.deassert().map_err(|_| DisplayError::ChipSelect);
        result.and(released)
    }

    /// Buffer index and bit mask for a pixel, after rotation
    fn locate(&self, x: i16, y: i16) -> Option<(usize, u8)> {
        let (w, h) = (WIDTH as i16, HEIGHT as i16);
        if x < 0 || x >= w || y < 0 || y >= h {
            return None;
        }
        let (x, y) = match self.config.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        };
        let (x, y) = (x as usize, y as usize);
        Some(((y * WIDTH as usize + x) / 8, 1 << (x & 7)))
    }
}

/// Assemble `[address, data.., 0x00]` for one line
fn line_packet(address: u8, data: &[u8]) -> [u8; LINE_PACKET_LEN] {
    let mut line = [0u8; LINE_PACKET_LEN];
    line[0] = address;
    line[1..=LINE_BYTES].copy_from_slice(data);
    line
}

impl<L, B, CS> DisplayBackend for SharpMemoryDisplay<'_, L, B, CS>
where
    L: BusLock + ?Sized,
    B: SpiBus,
    CS: ChipSelect,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        SharpMemoryDisplay::clear(self)
    }

    fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if on {
                self.buffer[index] |= mask;
            } else {
                self.buffer[index] &= !mask;
            }
        }
    }

    fn pixel(&self, x: i16, y: i16) -> bool {
        self.locate(x, y)
            .is_some_and(|(index, mask)| self.buffer[index] & mask != 0)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.refresh()
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }

    fn is_ready(&self) -> bool {
        true
    }
}
