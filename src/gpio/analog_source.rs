use crate::{microcontroller_src::peripherals::PeripheralError, utils::sampler_error::AdcDriverError};

/// Enums the different errors possible when working with the analog in
#[derive(Debug)]
pub enum AnalogInError {
    AdcDriverError(AdcDriverError),
    ChannelCreationError,
    ErrorReading,
    InvalidPeripheral(PeripheralError),
    InvalidPin,
}

impl From<AdcDriverError> for AnalogInError {
    fn from(value: AdcDriverError) -> Self {
        AnalogInError::AdcDriverError(value)
    }
}

/// Anything that can hand out raw ADC codes, one per call
pub trait AnalogSource {
    /// Performs one conversion and returns the raw code, without calibration.
    ///
    /// # Errors
    ///
    /// - `AnalogInError::ErrorReading`: If the conversion could not be completed
    fn read_raw(&mut self) -> Result<u16, AnalogInError>;

    /// Calibrated reading in millivolts, for sources with a calibration scheme
    fn calibrated_millivolts(&mut self) -> Option<u16> {
        None
    }
}

impl<S: AnalogSource + ?Sized> AnalogSource for &mut S {
    fn read_raw(&mut self) -> Result<u16, AnalogInError> {
        (**self).read_raw()
    }

    fn calibrated_millivolts(&mut self) -> Option<u16> {
        (**self).calibrated_millivolts()
    }
}
