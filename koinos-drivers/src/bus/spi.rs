//! `embedded-hal` SPI adapter
//!
//! `embedded_hal::spi::SpiBus` moves bytes and fixes clock and mode when
//! the peripheral is constructed. The drivers want whole words in a
//! chosen bit order, so the adapter splits words into big-endian bytes
//! and reverses bits in software for LSB-first transfers.

use embedded_hal::spi::SpiBus as EhSpiBus;
use koinos_hal::{BitOrder, SpiBus, SpiConfig, WordWidth};

/// Word-oriented view of an `embedded-hal` byte bus
pub struct EhSpi<S> {
    spi: S,
    config: SpiConfig,
}

impl<S> EhSpi<S> {
    /// Wrap a configured byte bus
    pub fn new(spi: S) -> Self {
        Self {
            spi,
            config: SpiConfig::default(),
        }
    }

    /// Configuration applied by the last [`SpiBus::configure`] call
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Give the byte bus back
    pub fn release(self) -> S {
        self.spi
    }

    /// Map a word between wire order and host order
    fn reorder(&self, width: WordWidth, word: u32) -> u32 {
        let word = word & width.mask();
        match self.config.bit_order {
            BitOrder::MsbFirst => word,
            BitOrder::LsbFirst => word.reverse_bits() >> (32 - width.bits()),
        }
    }
}

impl<S: EhSpiBus<u8>> SpiBus for EhSpi<S> {
    type Error = S::Error;

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        // Clock and mode belong to the board's bus constructor
        self.config = *config;
        Ok(())
    }

    fn transfer_word(&mut self, width: WordWidth, word: u32) -> Result<u32, Self::Error> {
        let len = width.bytes();
        let mut buf = [0u8; 4];
        let wire = self.reorder(width, word).to_be_bytes();
        buf[..len].copy_from_slice(&wire[4 - len..]);

        self.spi.transfer_in_place(&mut buf[..len])?;
        self.spi.flush()?;

        let mut rx = [0u8; 4];
        rx[4 - len..].copy_from_slice(&buf[..len]);
        Ok(self.reorder(width, u32::from_be_bytes(rx)))
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error> {
        if self.config.bit_order == BitOrder::LsbFirst {
            data.iter_mut().for_each(|b| *b = b.reverse_bits());
        }
        self.spi.transfer_in_place(data)?;
        self.spi.flush()?;
        if self.config.bit_order == BitOrder::LsbFirst {
            data.iter_mut().for_each(|b| *b = b.reverse_bits());
        }
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        match self.config.bit_order {
            BitOrder::MsbFirst => self.spi.write(data)?,
            BitOrder::LsbFirst => {
                for &byte in data {
                    self.spi.write(&[byte.reverse_bits()])?;
                }
            }
        }
        self.spi.flush()
    }
}
