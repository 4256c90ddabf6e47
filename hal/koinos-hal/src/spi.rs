//! SPI bus abstractions
//!
//! The drivers only need "transfer N bits, return the bits shifted in".
//! Everything else (pin muxing, clock dividers, FIFO handling) belongs to
//! the implementation.

/// Width of a single bus transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordWidth {
    /// 8-bit transfer
    Bits8,
    /// 16-bit transfer
    Bits16,
    /// 32-bit transfer
    Bits32,
}

impl WordWidth {
    /// Number of bits shifted per transfer
    pub const fn bits(self) -> u32 {
        match self {
            WordWidth::Bits8 => 8,
            WordWidth::Bits16 => 16,
            WordWidth::Bits32 => 32,
        }
    }

    /// Number of bytes shifted per transfer
    pub const fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Mask selecting the bits that fit in one transfer
    pub const fn mask(self) -> u32 {
        match self {
            WordWidth::Bits32 => u32::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }
}

/// SPI bus master
///
/// One instance per driver; several instances may address the same
/// physical bus as long as every transaction sequence runs under the
/// shared [`BusLock`](crate::BusLock).
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Apply clock rate, mode, bit order and word size
    ///
    /// Called once at the start of every locked transaction sequence since
    /// the other bus consumer may have left the peripheral configured
    /// differently.
    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;

    /// Shift out the low `width` bits of `word` and return the bits shifted in
    fn transfer_word(&mut self, width: WordWidth, word: u32) -> Result<u32, Self::Error>;

    /// Transfer data in place, one byte per transfer
    ///
    /// Writes data from buffer while reading into the same buffer.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        for byte in data.iter_mut() {
            *byte = self.transfer_word(WordWidth::Bits8, u32::from(*byte))? as u8;
        }
        Ok(())
    }

    /// Write data, discarding whatever is shifted in
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            self.transfer_word(WordWidth::Bits8, u32::from(byte))?;
        }
        Ok(())
    }
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        T::configure(self, config)
    }

    fn transfer_word(&mut self, width: WordWidth, word: u32) -> Result<u32, Self::Error> {
        T::transfer_word(self, width, word)
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        T::transfer_in_place(self, data)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Bit order on the wire
    pub bit_order: BitOrder,
    /// Word size used by the transaction sequence
    pub width: WordWidth,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            mode: Mode::Mode0,
            bit_order: BitOrder::MsbFirst,
            width: WordWidth::Bits8,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl Mode {
    /// Mode from its conventional number (0-3)
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Mode::Mode0),
            1 => Some(Mode::Mode1),
            2 => Some(Mode::Mode2),
            3 => Some(Mode::Mode3),
            _ => None,
        }
    }
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// Order in which bits of a word are shifted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}
