//! Chip-select and register-level GPIO abstractions
//!
//! The protocol code only ever says "select" or "deselect". Whether that
//! means driving a generic GPIO low, a pin high, or poking a dedicated
//! output register is decided when the capability is constructed.

/// Enable line of one peripheral on the shared bus
///
/// `active = true` addresses the device. Polarity is handled by the
/// implementation, never by the caller.
pub trait ChipSelect {
    /// Error type for line operations
    type Error;

    /// Assert (`true`) or deassert (`false`) the enable line
    fn select(&mut self, active: bool) -> Result<(), Self::Error>;

    /// Address the device
    fn assert(&mut self) -> Result<(), Self::Error> {
        self.select(true)
    }

    /// Release the device
    fn deassert(&mut self) -> Result<(), Self::Error> {
        self.select(false)
    }
}

impl<T: ChipSelect + ?Sized> ChipSelect for &mut T {
    type Error = T::Error;

    fn select(&mut self, active: bool) -> Result<(), Self::Error> {
        T::select(self, active)
    }
}

/// Identifies one 32-bit register of a register-mapped GPIO bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioRegister {
    /// Output level register
    Output,
    /// Output enable register
    Enable,
    /// Pad control register
    Control,
    /// Pin function select register
    Function,
}

/// Raw access to a register-mapped GPIO bank
///
/// Some lines (GPIO16 on the ESP8266 being the usual suspect) sit outside
/// the generic GPIO matrix and are only reachable through their own
/// registers.
pub trait RegisterBank {
    /// Read the current register value
    fn read(&self, register: GpioRegister) -> u32;

    /// Write a new register value
    fn write(&mut self, register: GpioRegister, value: u32);

    /// Read-modify-write a register
    fn modify(&mut self, register: GpioRegister, f: impl FnOnce(u32) -> u32) {
        let value = self.read(register);
        self.write(register, f(value));
    }
}
