//! Simulated camera stream and bus fakes shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use koinos_core::frame::word::{ROW_WORDS, SYNC_MASK};
use koinos_core::frame::{PACKET_LEN, PIXELS_PER_ROW};
use koinos_core::retry::Clock;
use koinos_hal::{BusLock, ChipSelect, SpiBus, SpiConfig, WordWidth};

/// Lock counting acquire/release pairs
#[derive(Default)]
pub struct CountingLock {
    pub acquired: Cell<u32>,
    pub released: Cell<u32>,
}

impl BusLock for CountingLock {
    fn acquire(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Camera side of the bus: plays back words or packets, zeros once drained
#[derive(Default)]
pub struct SimCamera {
    pub words: VecDeque<u32>,
    pub packets: VecDeque<Vec<u8>>,
    pub word_reads: usize,
    pub packet_reads: usize,
    pub configs: Vec<SpiConfig>,
}

impl SimCamera {
    pub fn with_words(words: Vec<u32>) -> Self {
        Self {
            words: words.into(),
            ..Default::default()
        }
    }

    pub fn with_packets(packets: Vec<Vec<u8>>) -> Self {
        Self {
            packets: packets.into(),
            ..Default::default()
        }
    }
}

impl SpiBus for SimCamera {
    type Error = ();

    fn configure(&mut self, config: &SpiConfig) -> Result<(), ()> {
        self.configs.push(*config);
        Ok(())
    }

    fn transfer_word(&mut self, _width: WordWidth, _word: u32) -> Result<u32, ()> {
        self.word_reads += 1;
        Ok(self.words.pop_front().unwrap_or(0))
    }

    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), ()> {
        self.packet_reads += 1;
        match self.packets.pop_front() {
            Some(packet) => data.copy_from_slice(&packet),
            None => data.fill(0),
        }
        Ok(())
    }
}

/// Enable line remembering its level
#[derive(Default)]
pub struct Line {
    pub active: bool,
}

impl ChipSelect for Line {
    type Error = ();

    fn select(&mut self, active: bool) -> Result<(), ()> {
        self.active = active;
        Ok(())
    }
}

/// Simulated millisecond clock
#[derive(Clone, Copy)]
pub struct SimClock<'a>(pub &'a Cell<u64>);

impl Clock for SimClock<'_> {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Delay that advances a simulated clock instead of sleeping
pub struct SimDelay<'a>(pub &'a Cell<u64>);

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns) / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.set(self.0.get() + u64::from(ms));
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// A status row as the camera sends it before image data
pub fn status_row() -> Vec<u32> {
    vec![SYNC_MASK; ROW_WORDS]
}

/// An image row carrying `seq` in its header word
pub fn image_row(seq: u8) -> Vec<u32> {
    let mut row = vec![u32::from(seq) << 16];
    row.extend((0..ROW_WORDS as u32 - 1).map(|i| 0x1000_0000 | (u32::from(seq) << 8) | i));
    row
}

/// `status` status rows followed by image rows carrying `seqs`
pub fn word_stream(status: usize, seqs: impl IntoIterator<Item = u8>) -> Vec<u32> {
    let mut words: Vec<u32> = (0..status).flat_map(|_| status_row()).collect();
    for seq in seqs {
        words.extend(image_row(seq));
    }
    words
}

/// A data packet for row `seq` whose pixels encode their position
pub fn data_packet(seq: u8) -> Vec<u8> {
    let mut bytes = vec![0u8; PACKET_LEN];
    bytes[0] = 0x00;
    bytes[1] = seq;
    for px in 0..PIXELS_PER_ROW {
        let value = (u16::from(seq) << 8) | px as u16;
        bytes[4 + 2 * px..6 + 2 * px].copy_from_slice(&value.to_be_bytes());
    }
    bytes
}

/// A filler packet with `header` (low nibble 0x0F) and junk payload
pub fn discard_packet(header: u8) -> Vec<u8> {
    let mut bytes = vec![0xA5; PACKET_LEN];
    bytes[0] = header;
    bytes[1] = 0xA5;
    bytes
}
