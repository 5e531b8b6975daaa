use std::mem;

const PIN_COUNT: usize = 40;
const UART_COUNT: usize = 3;
const UART_BOUNDS: (usize, usize) = (0, 2);
/// GPIOs wired to the ADC1, ordered by channel
const ADC1_PINS: [usize; 8] = [36, 37, 38, 39, 32, 33, 34, 35];
/// GPIOs that do not exist on the ESP32
const MISSING_PINS: [usize; 6] = [20, 24, 28, 29, 30, 31];
/// GPIOs that can only be used as inputs
const INPUT_ONLY_PINS: (usize, usize) = (34, 39);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralError {
    AlreadyTaken,
    NotAPin,
    NotAnOutputPin,
}

/// Represents an esp32 Peripheral allowing to instanciate diferent Peripheral Types
#[derive(Debug, Default, PartialEq, Eq)]
pub enum Peripheral {
    Pin(u8),
    Adc,
    Uart(u8),
    #[default]
    None,
}

impl Peripheral {
    fn take(&mut self) -> Peripheral {
        mem::take(self)
    }
}

/// Represents the available peripherals in the ESP32 and provides a way to get each particular
/// peripheral. Subsequent gets of the same peripheral will return Peripheral::None. The same pin
/// can be requested through different getters, but only the first one will return it.
pub struct Peripherals {
    pins: [Peripheral; PIN_COUNT],
    adc: Peripheral,
    uart: [Peripheral; UART_COUNT],
}

impl Peripherals {
    pub fn new() -> Peripherals {
        let pins: [Peripheral; PIN_COUNT] = std::array::from_fn(|pin_num| {
            if MISSING_PINS.contains(&pin_num) {
                Peripheral::None
            } else {
                Peripheral::Pin(pin_num as u8)
            }
        });
        let uart: [Peripheral; UART_COUNT] = std::array::from_fn(|uart_num| Peripheral::Uart(uart_num as u8));
        Peripherals {
            pins,
            adc: Peripheral::Adc,
            uart,
        }
    }

    /// Returns a pin usable as an output, which excludes the input only GPIO-34 to GPIO-39
    pub fn get_digital_pin(&mut self, pin_num: usize) -> Peripheral {
        if pin_num >= INPUT_ONLY_PINS.0 && pin_num <= INPUT_ONLY_PINS.1 {
            return Peripheral::None;
        }
        self.get_pin(pin_num)
    }

    /// Returns a pin usable as an input, including the input only GPIO-34 to GPIO-39
    pub fn get_input_pin(&mut self, pin_num: usize) -> Peripheral {
        self.get_pin(pin_num)
    }

    /// Returns a pin wired to the ADC1
    pub fn get_analog_pin(&mut self, pin_num: usize) -> Peripheral {
        if ADC1_PINS.contains(&pin_num) {
            return self.get_pin(pin_num);
        }
        Peripheral::None
    }

    fn get_pin(&mut self, pin_num: usize) -> Peripheral {
        match self.pins.get_mut(pin_num) {
            Some(pin) => pin.take(),
            None => Peripheral::None,
        }
    }

    pub fn get_adc(&mut self) -> Peripheral {
        self.adc.take()
    }

    pub fn get_uart(&mut self, uart_num: usize) -> Peripheral {
        if uart_num >= UART_BOUNDS.0 && uart_num <= UART_BOUNDS.1 {
            return self.uart[uart_num].take();
        }
        Peripheral::None
    }
}

impl Default for Peripherals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
mod pins {
    use super::{Peripheral, PeripheralError};
    use esp_idf_svc::hal::gpio::*;

    impl Peripheral {
        /// If the Peripheral is a Pin that can drive an output returns the corresponding AnyIOPin.
        ///
        /// # Errors
        ///
        /// - `PeripheralError::AlreadyTaken`: If the Peripheral is None
        /// - `PeripheralError::NotAnOutputPin`: If the pin is one of the input only GPIOs
        /// - `PeripheralError::NotAPin`: If the Peripheral is not a pin
        pub fn into_any_io_pin(self) -> Result<AnyIOPin, PeripheralError> {
            let pin = match self {
                Peripheral::Pin(pin_num) => match pin_num {
                    0 => unsafe { Gpio0::new().downgrade() },
                    1 => unsafe { Gpio1::new().downgrade() },
                    2 => unsafe { Gpio2::new().downgrade() },
                    3 => unsafe { Gpio3::new().downgrade() },
                    4 => unsafe { Gpio4::new().downgrade() },
                    5 => unsafe { Gpio5::new().downgrade() },
                    6 => unsafe { Gpio6::new().downgrade() },
                    7 => unsafe { Gpio7::new().downgrade() },
                    8 => unsafe { Gpio8::new().downgrade() },
                    9 => unsafe { Gpio9::new().downgrade() },
                    10 => unsafe { Gpio10::new().downgrade() },
                    11 => unsafe { Gpio11::new().downgrade() },
                    12 => unsafe { Gpio12::new().downgrade() },
                    13 => unsafe { Gpio13::new().downgrade() },
                    14 => unsafe { Gpio14::new().downgrade() },
                    15 => unsafe { Gpio15::new().downgrade() },
                    16 => unsafe { Gpio16::new().downgrade() },
                    17 => unsafe { Gpio17::new().downgrade() },
                    18 => unsafe { Gpio18::new().downgrade() },
                    19 => unsafe { Gpio19::new().downgrade() },
                    21 => unsafe { Gpio21::new().downgrade() },
                    22 => unsafe { Gpio22::new().downgrade() },
                    23 => unsafe { Gpio23::new().downgrade() },
                    25 => unsafe { Gpio25::new().downgrade() },
                    26 => unsafe { Gpio26::new().downgrade() },
                    27 => unsafe { Gpio27::new().downgrade() },
                    32 => unsafe { Gpio32::new().downgrade() },
                    33 => unsafe { Gpio33::new().downgrade() },
                    34..=39 => return Err(PeripheralError::NotAnOutputPin),
                    _ => return Err(PeripheralError::NotAPin),
                },
                Peripheral::None => return Err(PeripheralError::AlreadyTaken),
                _ => return Err(PeripheralError::NotAPin),
            };
            Ok(pin)
        }

        /// If the Peripheral is a Pin returns the corresponding AnyInputPin.
        ///
        /// # Errors
        ///
        /// - `PeripheralError::AlreadyTaken`: If the Peripheral is None
        /// - `PeripheralError::NotAPin`: If the Peripheral is not a pin
        pub fn into_any_input_pin(self) -> Result<AnyInputPin, PeripheralError> {
            let pin = match self {
                Peripheral::Pin(pin_num) => match pin_num {
                    34 => unsafe { Gpio34::new().downgrade_input() },
                    35 => unsafe { Gpio35::new().downgrade_input() },
                    36 => unsafe { Gpio36::new().downgrade_input() },
                    37 => unsafe { Gpio37::new().downgrade_input() },
                    38 => unsafe { Gpio38::new().downgrade_input() },
                    39 => unsafe { Gpio39::new().downgrade_input() },
                    _ => Peripheral::Pin(pin_num).into_any_io_pin()?.into(),
                },
                Peripheral::None => return Err(PeripheralError::AlreadyTaken),
                _ => return Err(PeripheralError::NotAPin),
            };
            Ok(pin)
        }
    }
}
