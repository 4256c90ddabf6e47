//! Chip-select line implementations
//!
//! The capture and refresh code only ever asks for "select" or
//! "deselect". Which of these implementations backs a device is decided
//! once, from its [`ChipSelectConfig`].

mod line;
mod mmio;
mod register;

pub use line::LineSelect;
pub use mmio::Gpio16Registers;
pub use register::{RegisterSelect, GP16_FUNCTION_GPIO};

use koinos_core::config::ChipSelectConfig;
use koinos_hal::{ChipSelect, RegisterBank};

/// Error from an [`AnySelect`] line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelectError<E> {
    /// The GPIO pin reported an error
    Pin(E),
}

/// Chip-select chosen at runtime from configuration
///
/// Lines listed as register-mapped go through the dedicated register bank;
/// everything else drives a plain output pin.
pub enum AnySelect<P, R> {
    /// Generic GPIO output
    Line(LineSelect<P>),
    /// Register-mapped output (GPIO16)
    Register(RegisterSelect<R>),
}

impl<P, R: RegisterBank> AnySelect<P, R> {
    /// Build the implementation `config` asks for
    ///
    /// `pin` is only consulted for generic lines and `bank` only for the
    /// register-mapped one; whichever is unused is dropped.
    pub fn from_config(config: &ChipSelectConfig, pin: P, bank: R) -> Self {
        if config.is_register_mapped() {
            debug!("cs line {=u8} is register-mapped", config.line);
            AnySelect::Register(RegisterSelect::new(bank, config.active_low))
        } else {
            AnySelect::Line(LineSelect::new(pin, config.active_low))
        }
    }
}

impl<P, R> ChipSelect for AnySelect<P, R>
where
    P: embedded_hal::digital::OutputPin,
    R: RegisterBank,
{
    type Error = SelectError<P::Error>;

    fn select(&mut self, active: bool) -> Result<(), Self::Error> {
        match self {
            AnySelect::Line(line) => line.select(active).map_err(SelectError::Pin),
            AnySelect::Register(reg) => match reg.select(active) {
                Ok(()) => Ok(()),
                Err(never) => match never {},
            },
        }
    }
}
