//! Display backend trait
//!
//! Defines the interface for pixel-addressed monochrome displays.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// No bus lock was supplied at initialization
    BusUnavailable,
    /// Communication error with display
    Communication,
    /// The chip-select line reported an error
    ChipSelect,
}

/// Display backend trait
///
/// Drawing only touches the local frame buffer; nothing reaches the panel
/// until [`flush`](DisplayBackend::flush).
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Set (`true`) or clear one pixel; off-screen coordinates are ignored
    fn set_pixel(&mut self, x: i16, y: i16, on: bool);

    /// Read one pixel back; off-screen coordinates read as clear
    fn pixel(&self, x: i16, y: i16) -> bool;

    /// Flush buffered content to the display
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (width, height) in pixels
    fn dimensions(&self) -> (u16, u16);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
