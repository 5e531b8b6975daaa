use std::fmt;

use crate::{config::ConfigError, gpio::AnalogInError, serial::SerialError};

/// Errors that can happen while driving the ADC driver of the microcontroller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcDriverError {
    AlreadyTaken,
    ClockError,
    InvalidArgs,
    Other(i32),
}

/// Every failure the sampler can run into, either while starting up or on a
/// single sampling cycle.
#[derive(Debug)]
pub enum SamplerError {
    AnalogIn(AnalogInError),
    Config(ConfigError),
    OutOfRange { raw: u16, full_scale: u16 },
    Serial(SerialError),
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplerError::AnalogIn(err) => write!(f, "ADC read failed: {err:?}"),
            SamplerError::Config(err) => write!(f, "invalid sampler configuration: {err}"),
            SamplerError::OutOfRange { raw, full_scale } => {
                write!(f, "raw value {raw} is above the full scale value {full_scale}")
            }
            SamplerError::Serial(err) => write!(f, "serial transport failed: {err:?}"),
        }
    }
}

impl std::error::Error for SamplerError {}

impl From<AnalogInError> for SamplerError {
    fn from(value: AnalogInError) -> Self {
        SamplerError::AnalogIn(value)
    }
}

impl From<ConfigError> for SamplerError {
    fn from(value: ConfigError) -> Self {
        SamplerError::Config(value)
    }
}

impl From<SerialError> for SamplerError {
    fn from(value: SerialError) -> Self {
        SamplerError::Serial(value)
    }
}

impl From<AdcDriverError> for SamplerError {
    fn from(value: AdcDriverError) -> Self {
        SamplerError::AnalogIn(AnalogInError::AdcDriverError(value))
    }
}
