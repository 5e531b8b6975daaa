use esp_idf_svc::hal::{
    gpio::AnyIOPin,
    uart::{config, UartDriver, UART0, UART1, UART2},
    units::Hertz,
};

use crate::{microcontroller_src::peripherals::Peripheral, utils::sampler_error::SamplerError};

use super::{LineWriter, SerialError};

/// Terminator appended by `write_line`, the same one Arduino's `println` sends
const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Enums the different errors possible when working with the UART
#[derive(Debug)]
pub enum UARTError {
    InvalidBaudrate,
    InvalidPin,
    InvalidUartNumber,
    DriverError,
    WriteError,
}

/// Enums the parity settings of the UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Enums the amount of stop bits of the UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBit {
    One,
    OnePointFive,
    Two,
}

/// Driver for a UART port, used as the transport of the readings
pub struct UART<'a> {
    driver: UartDriver<'a>,
}

impl<'a> UART<'a> {
    /// Creates a new UART on the given pins
    ///
    /// # Arguments
    ///
    /// - `tx`: Peripheral of the pin used for transmission
    /// - `rx`: Peripheral of the pin used for reception
    /// - `uart_peripheral`: Peripheral of the UART port
    /// - `baudrate`: Bits per second of the line
    /// - `parity`: Parity setting
    /// - `stopbit`: Stop bit setting
    ///
    /// # Errors
    ///
    /// - `UARTError::InvalidBaudrate`: If the baudrate is 0
    /// - `UARTError::InvalidPin`: If either pin is not valid for its role or already taken
    /// - `UARTError::InvalidUartNumber`: If the UART Peripheral is not valid or already taken
    /// - `UARTError::DriverError`: If the ESP-IDF driver could not be installed
    pub fn new(
        tx: Peripheral,
        rx: Peripheral,
        uart_peripheral: Peripheral,
        baudrate: u32,
        parity: Parity,
        stopbit: StopBit,
    ) -> Result<UART<'a>, UARTError> {
        if baudrate == 0 {
            return Err(UARTError::InvalidBaudrate);
        }
        let tx_pin = tx.into_any_io_pin().map_err(|_| UARTError::InvalidPin)?;
        let rx_pin = rx.into_any_input_pin().map_err(|_| UARTError::InvalidPin)?;
        let config = set_config(baudrate, parity, stopbit);

        let driver = match uart_peripheral {
            Peripheral::Uart(0) => UartDriver::new(
                unsafe { UART0::new() },
                tx_pin,
                rx_pin,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            ),
            Peripheral::Uart(1) => UartDriver::new(
                unsafe { UART1::new() },
                tx_pin,
                rx_pin,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            ),
            Peripheral::Uart(2) => UartDriver::new(
                unsafe { UART2::new() },
                tx_pin,
                rx_pin,
                Option::<AnyIOPin>::None,
                Option::<AnyIOPin>::None,
                &config,
            ),
            _ => return Err(UARTError::InvalidUartNumber),
        }
        .map_err(|_| UARTError::DriverError)?;

        Ok(UART { driver })
    }

    /// Writes every byte of `bytes_to_write`, blocking until the driver accepted all of them.
    ///
    /// # Errors
    ///
    /// - `UARTError::WriteError`: If the driver failed or stopped accepting bytes
    pub fn write(&mut self, bytes_to_write: &[u8]) -> Result<usize, UARTError> {
        let mut written = 0;
        while written < bytes_to_write.len() {
            match self.driver.write(&bytes_to_write[written..]) {
                Ok(0) | Err(_) => return Err(UARTError::WriteError),
                Ok(n) => written += n,
            }
        }
        Ok(written)
    }
}

impl LineWriter for UART<'_> {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        self.write(line.as_bytes())?;
        self.write(LINE_TERMINATOR)?;
        Ok(())
    }
}

fn set_config(baudrate: u32, parity: Parity, stopbit: StopBit) -> config::Config {
    let config = config::Config::new().baudrate(Hertz(baudrate));
    let config = match parity {
        Parity::None => config.parity_none(),
        Parity::Even => config.parity_even(),
        Parity::Odd => config.parity_odd(),
    };
    match stopbit {
        StopBit::One => config.stop_bits(config::StopBits::STOP1),
        StopBit::OnePointFive => config.stop_bits(config::StopBits::STOP1P5),
        StopBit::Two => config.stop_bits(config::StopBits::STOP2),
    }
}

impl From<UARTError> for SerialError {
    fn from(value: UARTError) -> Self {
        match value {
            UARTError::WriteError => SerialError::WriteError,
            _ => SerialError::TransportUnavailable,
        }
    }
}

impl From<UARTError> for SamplerError {
    fn from(value: UARTError) -> Self {
        SamplerError::Serial(value.into())
    }
}
