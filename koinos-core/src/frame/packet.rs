//! Byte-packet frame layout
//!
//! Packet format (164 bytes):
//! - HEADER (1 byte): low nibble `0x0F` marks a discard packet
//! - SEQUENCE (1 byte): destination line of the payload
//! - CRC (2 bytes): carried through, not checked
//! - PAYLOAD (160 bytes): 80 big-endian 16-bit pixels

use super::{FRAME_ROWS, PACKET_LEN, PIXELS_PER_ROW};

/// Header low nibble of a discard packet
pub const DISCARD_NIBBLE: u8 = 0x0F;

/// Bytes preceding the payload
pub const PACKET_HEADER_LEN: usize = 4;

/// Payload bytes per packet
pub const PAYLOAD_LEN: usize = PACKET_LEN - PACKET_HEADER_LEN;

/// Errors from packet handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Fewer bytes than one packet
    TooShort,
    /// Sequence number points outside the frame
    OutOfFrame(u8),
}

/// Check whether a header byte marks a discard packet
#[inline]
pub const fn is_discard_header(header: u8) -> bool {
    header & 0x0F == DISCARD_NIBBLE
}

/// Borrowed view of one received packet
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    bytes: &'a [u8; PACKET_LEN],
}

impl<'a> Packet<'a> {
    /// Wrap a full packet buffer
    pub const fn new(bytes: &'a [u8; PACKET_LEN]) -> Self {
        Self { bytes }
    }

    /// View the first [`PACKET_LEN`] bytes of `bytes` as a packet
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PacketError> {
        bytes
            .get(..PACKET_LEN)
            .and_then(|b| b.try_into().ok())
            .map(Self::new)
            .ok_or(PacketError::TooShort)
    }

    /// Raw header byte
    pub fn header(&self) -> u8 {
        self.bytes[0]
    }

    /// Check whether this is a filler packet with no image data
    pub fn is_discard(&self) -> bool {
        is_discard_header(self.header())
    }

    /// Line this packet belongs to
    pub fn sequence(&self) -> u8 {
        self.bytes[1]
    }

    /// CRC field as sent by the camera
    pub fn crc(&self) -> u16 {
        u16::from_be_bytes([self.bytes[2], self.bytes[3]])
    }

    /// Payload bytes
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[PACKET_HEADER_LEN..]
    }

    /// Payload decoded as big-endian pixels
    pub fn pixels(&self) -> impl Iterator<Item = u16> + 'a {
        self.payload()
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }
}

/// One line of pixel intensities
pub type PixelRow = [u16; PIXELS_PER_ROW];

/// Caller-owned buffer for one byte-packet frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    rows: [PixelRow; FRAME_ROWS],
}

impl Default for PixelFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelFrame {
    /// Create a zeroed frame
    pub const fn new() -> Self {
        Self {
            rows: [[0; PIXELS_PER_ROW]; FRAME_ROWS],
        }
    }

    /// Zero every pixel
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }

    /// Check whether every pixel is zero
    pub fn is_zeroed(&self) -> bool {
        self.rows.iter().flatten().all(|&px| px == 0)
    }

    /// All lines
    pub fn rows(&self) -> &[PixelRow; FRAME_ROWS] {
        &self.rows
    }

    /// Line by index
    pub fn row(&self, index: usize) -> Option<&PixelRow> {
        self.rows.get(index)
    }

    /// Pixel value at column `x`, line `y`
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Unpack a data packet into the line it announces
    ///
    /// Returns the line written. Discard packets must be filtered by the
    /// caller; this only checks the destination is inside the frame.
    pub fn write_packet(&mut self, packet: &Packet<'_>) -> Result<u8, PacketError> {
        let seq = packet.sequence();
        let row = self
            .rows
            .get_mut(usize::from(seq))
            .ok_or(PacketError::OutOfFrame(seq))?;

        for (dst, px) in row.iter_mut().zip(packet.pixels()) {
            *dst = px;
        }
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn packet_bytes(header: u8, seq: u8, fill: u8) -> [u8; PACKET_LEN] {
        let mut bytes = [fill; PACKET_LEN];
        bytes[0] = header;
        bytes[1] = seq;
        bytes[2] = 0xC1;
        bytes[3] = 0xC2;
        bytes
    }

    #[test]
    fn test_packet_fields() {
        let bytes = packet_bytes(0x00, 12, 0x00);
        let packet = Packet::new(&bytes);

        assert!(!packet.is_discard());
        assert_eq!(packet.sequence(), 12);
        assert_eq!(packet.crc(), 0xC1C2);
        assert_eq!(packet.payload().len(), PAYLOAD_LEN);
        assert_eq!(packet.pixels().count(), PIXELS_PER_ROW);
    }

    #[test]
    fn test_discard_nibble() {
        assert!(is_discard_header(0x0F));
        assert!(is_discard_header(0xAF));
        assert!(!is_discard_header(0x00));
        assert!(!is_discard_header(0xF0));

        let bytes = packet_bytes(0x1F, 0xFF, 0xEE);
        assert!(Packet::new(&bytes).is_discard());
    }

    #[test]
    fn test_parse_length() {
        let short = [0u8; PACKET_LEN - 1];
        assert_eq!(Packet::parse(&short).unwrap_err(), PacketError::TooShort);

        let long = [0u8; PACKET_LEN + 8];
        assert!(Packet::parse(&long).is_ok());
    }

    #[test]
    fn test_pixels_big_endian() {
        let mut bytes = packet_bytes(0x00, 0, 0);
        bytes[4] = 0x12;
        bytes[5] = 0x34;
        bytes[162] = 0xAB;
        bytes[163] = 0xCD;

        let packet = Packet::new(&bytes);
        let first = packet.pixels().next();
        let last = packet.pixels().last();
        assert_eq!(first, Some(0x1234));
        assert_eq!(last, Some(0xABCD));
    }

    #[test]
    fn test_write_packet_to_announced_row() {
        let bytes = packet_bytes(0x00, 7, 0x01);
        let mut frame = PixelFrame::new();

        assert_eq!(frame.write_packet(&Packet::new(&bytes)), Ok(7));
        assert!(frame.row(7).unwrap().iter().all(|&px| px == 0x0101));
        assert!(frame.row(6).unwrap().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_write_packet_out_of_frame() {
        let bytes = packet_bytes(0x00, 60, 0x01);
        let mut frame = PixelFrame::new();

        assert_eq!(
            frame.write_packet(&Packet::new(&bytes)),
            Err(PacketError::OutOfFrame(60))
        );
        assert!(frame.is_zeroed());
    }

    proptest! {
        #[test]
        fn prop_discard_depends_only_on_low_nibble(header in 0u8..=255) {
            let bytes = packet_bytes(header, 0, 0);
            prop_assert_eq!(Packet::new(&bytes).is_discard(), header & 0x0F == 0x0F);
        }

        #[test]
        fn prop_pixels_cover_payload(payload in proptest::collection::vec(any::<u8>(), PAYLOAD_LEN)) {
            let mut bytes = [0u8; PACKET_LEN];
            bytes[PACKET_HEADER_LEN..].copy_from_slice(&payload);
            let packet = Packet::new(&bytes);

            for (i, px) in packet.pixels().enumerate() {
                prop_assert_eq!(px.to_be_bytes(), [payload[2 * i], payload[2 * i + 1]]);
            }
        }
    }
}
