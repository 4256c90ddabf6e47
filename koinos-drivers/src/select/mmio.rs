//! ESP8266 GPIO16 register bank

#![allow(unsafe_code)]

use koinos_hal::{GpioRegister, RegisterBank};

const PERIPHERAL_BASE: usize = 0x6000_0000;

const fn offset(register: GpioRegister) -> usize {
    match register {
        GpioRegister::Output => 0x768,
        GpioRegister::Enable => 0x774,
        GpioRegister::Control => 0x790,
        GpioRegister::Function => 0x7A0,
    }
}

/// Volatile access to the RTC-block GPIO16 registers
pub struct Gpio16Registers {
    _private: (),
}

impl Gpio16Registers {
    /// Claim the GPIO16 registers
    ///
    /// # Safety
    ///
    /// Must only be called on an ESP8266, and at most one instance may
    /// exist at a time.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn ptr(register: GpioRegister) -> *mut u32 {
        (PERIPHERAL_BASE + offset(register)) as *mut u32
    }
}

impl RegisterBank for Gpio16Registers {
    fn read(&self, register: GpioRegister) -> u32 {
        // SAFETY: address is a valid, aligned ESP8266 register per `new`
        unsafe { core::ptr::read_volatile(Self::ptr(register)) }
    }

    fn write(&mut self, register: GpioRegister, value: u32) {
        // SAFETY: as above; `&mut self` serializes writers
        unsafe { core::ptr::write_volatile(Self::ptr(register), value) }
    }
}
