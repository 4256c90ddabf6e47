//! Chip-select on a generic GPIO output

use embedded_hal::digital::OutputPin;
use koinos_core::config::ChipSelectConfig;
use koinos_hal::ChipSelect;

/// Enable line driven through an `embedded-hal` output pin
pub struct LineSelect<P> {
    pin: P,
    active_low: bool,
}

impl<P> LineSelect<P> {
    /// Wrap `pin`; `active_low` selects the device by driving it low
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Wrap `pin` with the polarity from `config`
    pub fn from_config(pin: P, config: &ChipSelectConfig) -> Self {
        Self::new(pin, config.active_low)
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ChipSelect for LineSelect<P> {
    type Error = P::Error;

    fn select(&mut self, active: bool) -> Result<(), Self::Error> {
        if active != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
