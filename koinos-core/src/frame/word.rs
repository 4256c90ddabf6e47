//! Word-synchronized frame layout
//!
//! Rows are read as 41 big-endian 32-bit words. The first word is the
//! packet header:
//!
//! ```text
//! bit 31      28 27          16 15            0
//!     ┌─────────┬──────────────┬───────────────┐
//!     │ ignored │ ID (seq 23:16)│ CRC           │
//!     └─────────┴──────────────┴───────────────┘
//! ```
//!
//! A header whose low 28 bits are all set marks a status row. The
//! remaining 40 words carry 80 pixels, high half first.

use super::{FRAME_ROWS, PACKET_LEN, PIXELS_PER_ROW};

/// 32-bit words per row
pub const ROW_WORDS: usize = PACKET_LEN / 4;

/// Bits compared against the sentinel
pub const SYNC_MASK: u32 = 0x0FFF_FFFF;

/// Header bits holding the row sequence number
pub const SEQUENCE_MASK: u32 = 0x00FF_0000;

/// Shift of the sequence number inside the header word
pub const SEQUENCE_SHIFT: u32 = 16;

/// One raw row including its header word
pub type WordRow = [u32; ROW_WORDS];

/// Check whether a header word marks a status row (or the frame-sync marker)
#[inline]
pub const fn is_status_word(word: u32) -> bool {
    word & SYNC_MASK == SYNC_MASK
}

/// Extract the sequence number embedded in a header word
#[inline]
pub const fn row_sequence(word: u32) -> u8 {
    ((word & SEQUENCE_MASK) >> SEQUENCE_SHIFT) as u8
}

/// Iterate the 80 pixels of a raw row
pub fn row_pixels(row: &WordRow) -> impl Iterator<Item = u16> + '_ {
    row[1..]
        .iter()
        .flat_map(|&word| [(word >> 16) as u16, word as u16])
}

/// A row whose sequence field does not match its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SequenceMismatch {
    /// Position of the row in the frame
    pub row: u8,
    /// Sequence number found in its header
    pub found: u8,
}

/// Check that `sequences` reads exactly 0, 1, 2, ... in order
///
/// Returns the first row that breaks the order.
pub fn validate_sequence(
    sequences: impl IntoIterator<Item = u8>,
) -> Result<(), SequenceMismatch> {
    for (row, found) in sequences.into_iter().enumerate() {
        if usize::from(found) != row {
            return Err(SequenceMismatch {
                row: row as u8,
                found,
            });
        }
    }
    Ok(())
}

/// Caller-owned buffer for one word-synchronized frame
///
/// Allocate once (a `static` or a long-lived local) and reuse it across
/// captures; the grabber never keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordFrame {
    rows: [WordRow; FRAME_ROWS],
}

impl Default for WordFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl WordFrame {
    /// Create a zeroed frame
    pub const fn new() -> Self {
        Self {
            rows: [[0; ROW_WORDS]; FRAME_ROWS],
        }
    }

    /// Zero every word
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }

    /// Check whether every word is zero
    pub fn is_zeroed(&self) -> bool {
        self.rows.iter().flatten().all(|&word| word == 0)
    }

    /// All raw rows
    pub fn rows(&self) -> &[WordRow; FRAME_ROWS] {
        &self.rows
    }

    /// All raw rows, mutable
    pub fn rows_mut(&mut self) -> &mut [WordRow; FRAME_ROWS] {
        &mut self.rows
    }

    /// Raw row by index
    pub fn row(&self, index: usize) -> Option<&WordRow> {
        self.rows.get(index)
    }

    /// Sequence numbers in row order
    pub fn sequence_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().map(|row| row_sequence(row[0]))
    }

    /// Check the frame carries sequence numbers 0..59 in row order
    pub fn validate(&self) -> Result<(), SequenceMismatch> {
        validate_sequence(self.sequence_numbers())
    }

    /// Pixel value at column `x`, line `y`
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x >= PIXELS_PER_ROW {
            return None;
        }
        let row = self.rows.get(y)?;
        let word = row[1 + x / 2];
        Some(if x % 2 == 0 {
            (word >> 16) as u16
        } else {
            word as u16
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn header(seq: u8) -> u32 {
        (u32::from(seq) << SEQUENCE_SHIFT) | 0x0000_1234
    }

    fn valid_frame() -> WordFrame {
        let mut frame = WordFrame::new();
        for (y, row) in frame.rows_mut().iter_mut().enumerate() {
            row[0] = header(y as u8);
        }
        frame
    }

    #[test]
    fn test_status_word_detection() {
        assert!(is_status_word(0x0FFF_FFFF));
        // The top nibble is ignored
        assert!(is_status_word(0xFFFF_FFFF));
        assert!(is_status_word(0x3FFF_FFFF));
        assert!(!is_status_word(0x0FFF_FFFE));
        assert!(!is_status_word(header(0)));
    }

    #[test]
    fn test_row_sequence() {
        assert_eq!(row_sequence(0x0025_ABCD), 0x25);
        assert_eq!(row_sequence(0xFF00_FFFF), 0);
        assert_eq!(row_sequence(header(59)), 59);
    }

    #[test]
    fn test_row_pixels() {
        let mut row = [0u32; ROW_WORDS];
        row[1] = 0x0102_0304;
        row[40] = 0xAAAA_5555;

        let pixels: [u16; PIXELS_PER_ROW] = {
            let mut out = [0; PIXELS_PER_ROW];
            for (dst, px) in out.iter_mut().zip(row_pixels(&row)) {
                *dst = px;
            }
            out
        };

        assert_eq!(row_pixels(&row).count(), PIXELS_PER_ROW);
        assert_eq!(pixels[0], 0x0102);
        assert_eq!(pixels[1], 0x0304);
        assert_eq!(pixels[78], 0xAAAA);
        assert_eq!(pixels[79], 0x5555);
    }

    #[test]
    fn test_valid_frame() {
        let frame = valid_frame();
        assert_eq!(frame.validate(), Ok(()));
        assert!(frame.sequence_numbers().eq(0..60));
    }

    #[test]
    fn test_corrupted_row_detected() {
        let mut frame = valid_frame();
        frame.rows_mut()[37][0] = header(99);

        assert_eq!(
            frame.validate(),
            Err(SequenceMismatch { row: 37, found: 99 })
        );
    }

    #[test]
    fn test_pixel_lookup() {
        let mut frame = WordFrame::new();
        frame.rows_mut()[3][2] = 0xBEEF_CAFE;

        assert_eq!(frame.pixel(2, 3), Some(0xBEEF));
        assert_eq!(frame.pixel(3, 3), Some(0xCAFE));
        assert_eq!(frame.pixel(80, 3), None);
        assert_eq!(frame.pixel(0, 60), None);
    }

    #[test]
    fn test_clear() {
        let mut frame = valid_frame();
        assert!(!frame.is_zeroed());
        frame.clear();
        assert!(frame.is_zeroed());
    }

    proptest! {
        #[test]
        fn prop_only_identity_order_validates(
            seqs in proptest::collection::vec(0u8..60, 60)
        ) {
            let identity = seqs.iter().enumerate().all(|(i, &s)| usize::from(s) == i);
            prop_assert_eq!(validate_sequence(seqs.iter().copied()).is_ok(), identity);
        }

        #[test]
        fn prop_first_mismatch_reported(row in 0usize..60, found in 0u8..=255) {
            prop_assume!(usize::from(found) != row);
            let mut frame = valid_frame();
            frame.rows_mut()[row][0] = header(found);

            prop_assert_eq!(
                frame.validate(),
                Err(SequenceMismatch { row: row as u8, found })
            );
        }
    }
}
