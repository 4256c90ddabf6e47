//! Frame layouts for the thermal camera
//!
//! The camera streams one image as 60 lines of 80 16-bit pixels. Each line
//! travels as one 164-byte packet (4 header bytes + 160 payload bytes).
//! Two generations of the grabber read those packets differently:
//!
//! - [`word`]: 32-bit word transfers, status rows detected by a sentinel,
//!   frame validated after the fact by its embedded sequence numbers
//! - [`packet`]: byte packets, each data packet announcing its own row

pub mod packet;
pub mod word;

pub use packet::{Packet, PacketError, PixelFrame, PixelRow};
pub use word::{SequenceMismatch, WordFrame, WordRow};

/// Image lines per frame
pub const FRAME_ROWS: usize = 60;

/// Pixels per image line
pub const PIXELS_PER_ROW: usize = 80;

/// Bytes per line on the wire (header + payload)
pub const PACKET_LEN: usize = 164;

/// Index of the last image line
pub const LAST_ROW: u8 = (FRAME_ROWS - 1) as u8;
