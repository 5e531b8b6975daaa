use esp_idf_svc::hal::adc::{oneshot::AdcDriver, ADC1};
use std::rc::Rc;

use crate::{
    config::{Attenuation, Resolution},
    gpio::{AnalogIn, AnalogInError},
    microcontroller_src::peripherals::*,
    serial::{Parity, StopBit, UARTError, UART},
    utils::{error_text_parser::map_adc_driver_errors, sampler_error::AdcDriverError},
};

pub type SharableAdcDriver<'a> = Rc<AdcDriver<'a, ADC1>>;

/// Primary abstraction for interacting with the microcontroller, providing access to the
/// peripherals and drivers required to sample an analog pin and report over a UART.
///
/// - `peripherals`: An instance of `Peripherals`, handing out each hardware peripheral once.
/// - `adc_driver`: An optional shared instance of `SharableAdcDriver`, started the first time an
///   analog pin is requested and shared by every channel afterwards.
pub struct Microcontroller<'a> {
    peripherals: Peripherals,
    adc_driver: Option<SharableAdcDriver<'a>>,
}

impl<'a> Microcontroller<'a> {
    /// Creates a new Microcontroller instance. Must be called only once, since every
    /// peripheral is handed out by it.
    pub fn take() -> Self {
        esp_idf_svc::sys::link_patches();
        Microcontroller {
            peripherals: Peripherals::new(),
            adc_driver: None,
        }
    }

    /// Starts an adc driver if no other was started before
    ///
    /// # Errors
    ///
    /// - `AdcDriverError::AlreadyTaken`: If the ADC1 peripheral was already taken
    fn start_adc_driver(&mut self) -> Result<(), AdcDriverError> {
        if self.adc_driver.is_none() {
            if let Peripheral::None = self.peripherals.get_adc() {
                return Err(AdcDriverError::AlreadyTaken);
            }
            let driver = AdcDriver::new(unsafe { ADC1::new() }).map_err(map_adc_driver_errors)?;
            self.adc_driver.replace(Rc::new(driver));
        };
        Ok(())
    }

    /// Sets pin as analog input of the ADC1 with the given attenuation and resolution.
    /// The ADC configuration stays for as long as the `AnalogIn` lives.
    ///
    /// # Arguments
    ///
    /// - `pin_num`: The number of the pin on the microcontroller, one of GPIO-32 to GPIO-39.
    /// - `attenuation`: The input range of the pin. `Attenuation::High` maps 0 to 3.3V.
    /// - `resolution`: The bit width of each conversion.
    ///
    /// # Returns
    ///
    /// An `AnalogIn` instance that can be used to read analog inputs from the specified pin.
    ///
    /// # Errors
    ///
    /// - `AnalogInError::AdcDriverError`: If the ADC driver could not be started
    /// - `AnalogInError::InvalidPin`: If the pin is not wired to the ADC1
    /// - `AnalogInError::InvalidPeripheral`: If the pin was already taken
    pub fn set_pin_as_analog_in(
        &mut self,
        pin_num: usize,
        attenuation: Attenuation,
        resolution: Resolution,
    ) -> Result<AnalogIn<'a>, AnalogInError> {
        self.start_adc_driver()?;
        let pin_peripheral = self.peripherals.get_analog_pin(pin_num);
        let adc_driver = self
            .adc_driver
            .clone()
            .ok_or(AnalogInError::AdcDriverError(AdcDriverError::AlreadyTaken))?;
        AnalogIn::new(pin_peripheral, adc_driver, attenuation, resolution)
    }

    /// Configures the specified pins for a UART configuration with custom settings.
    ///
    /// # Arguments
    ///
    /// - `tx_pin`: The pin number to be used for UART transmission (TX).
    /// - `rx_pin`: The pin number to be used for UART reception (RX).
    /// - `uart_num`: The UART number to be configured.
    /// - `baudrate`: The baud rate for the UART communication.
    /// - `parity`: The parity setting for the UART.
    /// - `stopbit`: The stop bit configuration for the UART.
    ///
    /// # Errors
    ///
    /// - `UARTError::InvalidPin`: If either pin is invalid or already taken
    /// - `UARTError::InvalidUartNumber`: If the UART does not exist or is already taken
    /// - `UARTError::InvalidBaudrate`: If the baudrate is 0
    pub fn set_pins_for_uart(
        &mut self,
        tx_pin: usize,
        rx_pin: usize,
        uart_num: usize,
        baudrate: u32,
        parity: Parity,
        stopbit: StopBit,
    ) -> Result<UART<'a>, UARTError> {
        let tx_peripheral = self.peripherals.get_digital_pin(tx_pin);
        let rx_peripheral = self.peripherals.get_input_pin(rx_pin);
        let uart_peripheral = self.peripherals.get_uart(uart_num);

        UART::new(tx_peripheral, rx_peripheral, uart_peripheral, baudrate, parity, stopbit)
    }
}
