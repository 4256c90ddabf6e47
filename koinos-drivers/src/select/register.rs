//! Chip-select on a register-mapped GPIO line
//!
//! GPIO16 on the ESP8266 lives in the RTC block rather than the GPIO
//! matrix. It has its own output, enable, pad control and function
//! registers, and only bit 0 of each matters.

use koinos_hal::{ChipSelect, GpioRegister, RegisterBank};

/// Function-select value routing the pad to the GPIO output
pub const GP16_FUNCTION_GPIO: u32 = 1;

const LINE_BIT: u32 = 1;

/// Enable line driven through a [`RegisterBank`]
pub struct RegisterSelect<R> {
    bank: R,
    active_low: bool,
}

impl<R: RegisterBank> RegisterSelect<R> {
    /// Switch the pad to GPIO output mode and take ownership of the bank
    pub fn new(mut bank: R, active_low: bool) -> Self {
        bank.write(GpioRegister::Function, GP16_FUNCTION_GPIO);
        bank.write(GpioRegister::Control, 0);
        bank.modify(GpioRegister::Enable, |v| v | LINE_BIT);
        Self { bank, active_low }
    }

    /// Borrow the register bank
    pub fn bank(&self) -> &R {
        &self.bank
    }
}

impl<R: RegisterBank> ChipSelect for RegisterSelect<R> {
    type Error = core::convert::Infallible;

    fn select(&mut self, active: bool) -> Result<(), Self::Error> {
        let high = active != self.active_low;
        self.bank.modify(GpioRegister::Output, |v| {
            if high {
                v | LINE_BIT
            } else {
                v & !LINE_BIT
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Bank {
        output: u32,
        enable: u32,
        control: u32,
        function: u32,
    }

    impl RegisterBank for Bank {
        fn read(&self, register: GpioRegister) -> u32 {
            match register {
                GpioRegister::Output => self.output,
                GpioRegister::Enable => self.enable,
                GpioRegister::Control => self.control,
                GpioRegister::Function => self.function,
            }
        }

        fn write(&mut self, register: GpioRegister, value: u32) {
            match register {
                GpioRegister::Output => self.output = value,
                GpioRegister::Enable => self.enable = value,
                GpioRegister::Control => self.control = value,
                GpioRegister::Function => self.function = value,
            }
        }
    }

    #[test]
    fn test_init_configures_pad() {
        let bank = Bank {
            enable: 0x10,
            control: 0xFF,
            ..Default::default()
        };
        let cs = RegisterSelect::new(bank, true);

        assert_eq!(cs.bank().function, GP16_FUNCTION_GPIO);
        assert_eq!(cs.bank().control, 0);
        // Other enable bits untouched
        assert_eq!(cs.bank().enable, 0x11);
    }

    #[test]
    fn test_only_bit_zero_toggles() {
        let bank = Bank {
            output: 0xF0,
            ..Default::default()
        };
        let mut cs = RegisterSelect::new(bank, true);

        cs.deassert().unwrap();
        assert_eq!(cs.bank().output, 0xF1);

        cs.assert().unwrap();
        assert_eq!(cs.bank().output, 0xF0);
    }
}
