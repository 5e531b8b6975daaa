use crate::{
    config::{Attenuation, Resolution},
    microcontroller_src::{
        microcontroller::SharableAdcDriver,
        peripherals::{Peripheral, PeripheralError},
    },
};
use esp_idf_svc::hal::{
    adc::{attenuation::adc_atten_t, Resolution as AdcResolution, *},
    gpio::*,
};
use oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver};
use std::rc::Rc;

use super::{AnalogInError, AnalogSource};

/// Driver for receiving analog inputs from a particular pin
/// - `adc_channel_driver`: Instance of AnalogChannels
pub struct AnalogIn<'a> {
    adc_channel_driver: AnalogChannels<'a>,
}

/// Enums the possible channels from the ADC1. In the ESP32 the ADC1 has 8
/// channels, on GPIO-32 to GPIO-39 inclusive
enum AnalogChannels<'a> {
    Channel0(AdcChannelDriver<'a, Gpio36, Rc<AdcDriver<'a, ADC1>>>),
    Channel1(AdcChannelDriver<'a, Gpio37, Rc<AdcDriver<'a, ADC1>>>),
    Channel2(AdcChannelDriver<'a, Gpio38, Rc<AdcDriver<'a, ADC1>>>),
    Channel3(AdcChannelDriver<'a, Gpio39, Rc<AdcDriver<'a, ADC1>>>),
    Channel4(AdcChannelDriver<'a, Gpio32, Rc<AdcDriver<'a, ADC1>>>),
    Channel5(AdcChannelDriver<'a, Gpio33, Rc<AdcDriver<'a, ADC1>>>),
    Channel6(AdcChannelDriver<'a, Gpio34, Rc<AdcDriver<'a, ADC1>>>),
    Channel7(AdcChannelDriver<'a, Gpio35, Rc<AdcDriver<'a, ADC1>>>),
}

impl<'a> AnalogIn<'a> {
    /// Create a new AnalogIn for a specific pin.
    ///
    /// # Arguments
    ///
    /// - `pin`: A Peripheral of type Pin
    /// - `adc_driver`: An instance of a SharableAdcDriver
    /// - `attenuation`: The input range of the channel
    /// - `resolution`: The bit width of the conversions
    ///
    /// # Returns
    ///
    /// A `Result` containing the new `AnalogIn` instance, or an `AnalogInError` if the
    /// initialization fails.
    ///
    /// # Errors
    ///
    /// - `AnalogInError::InvalidPin`: If the pin is not connected to the ADC1
    /// - `AnalogInError::InvalidPeripheral`: If the Peripheral is not a pin or was already taken
    /// - `AnalogInError::ChannelCreationError`: If the channel could not be created
    pub(crate) fn new(
        pin: Peripheral,
        adc_driver: SharableAdcDriver<'a>,
        attenuation: Attenuation,
        resolution: Resolution,
    ) -> Result<Self, AnalogInError> {
        let mut config = AdcChannelConfig::new();
        config.attenuation = atten_from(attenuation);
        config.resolution = resolution_from(resolution);
        config.calibration = true;
        Ok(AnalogIn {
            adc_channel_driver: AnalogIn::new_channel(pin, adc_driver, &config)?,
        })
    }

    /// Creates a new analog channel driver for a given pin
    fn new_channel(
        pin: Peripheral,
        adc: SharableAdcDriver<'a>,
        config: &AdcChannelConfig,
    ) -> Result<AnalogChannels<'a>, AnalogInError> {
        let err = |_| AnalogInError::ChannelCreationError;
        let channel = match pin {
            Peripheral::Pin(pin_num) => match pin_num {
                36 => AnalogChannels::Channel0(
                    AdcChannelDriver::new(adc, unsafe { Gpio36::new() }, config).map_err(err)?,
                ),
                37 => AnalogChannels::Channel1(
                    AdcChannelDriver::new(adc, unsafe { Gpio37::new() }, config).map_err(err)?,
                ),
                38 => AnalogChannels::Channel2(
                    AdcChannelDriver::new(adc, unsafe { Gpio38::new() }, config).map_err(err)?,
                ),
                39 => AnalogChannels::Channel3(
                    AdcChannelDriver::new(adc, unsafe { Gpio39::new() }, config).map_err(err)?,
                ),
                32 => AnalogChannels::Channel4(
                    AdcChannelDriver::new(adc, unsafe { Gpio32::new() }, config).map_err(err)?,
                ),
                33 => AnalogChannels::Channel5(
                    AdcChannelDriver::new(adc, unsafe { Gpio33::new() }, config).map_err(err)?,
                ),
                34 => AnalogChannels::Channel6(
                    AdcChannelDriver::new(adc, unsafe { Gpio34::new() }, config).map_err(err)?,
                ),
                35 => AnalogChannels::Channel7(
                    AdcChannelDriver::new(adc, unsafe { Gpio35::new() }, config).map_err(err)?,
                ),
                _ => return Err(AnalogInError::InvalidPin),
            },
            Peripheral::None => {
                return Err(AnalogInError::InvalidPeripheral(
                    PeripheralError::AlreadyTaken,
                ))
            }
            _ => return Err(AnalogInError::InvalidPeripheral(PeripheralError::NotAPin)),
        };
        Ok(channel)
    }

    /// Returns the calibrated reading of the pin in millivolts. The range depends
    /// on the attenuation set.
    ///
    /// # Errors
    ///
    /// - `AnalogInError::ErrorReading`: If the read operation failed
    pub fn read_millivolts(&mut self) -> Result<u16, AnalogInError> {
        match self.adc_channel_driver {
            AnalogChannels::Channel0(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel1(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel2(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel3(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel4(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel5(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel6(ref mut channel_driver) => channel_driver.read(),
            AnalogChannels::Channel7(ref mut channel_driver) => channel_driver.read(),
        }
        .map_err(|_| AnalogInError::ErrorReading)
    }

    /// Returns the raw code read from the pin, in [0, 2^resolution - 1].
    ///
    /// # Errors
    ///
    /// - `AnalogInError::ErrorReading`: If the read operation failed
    pub fn read_raw(&mut self) -> Result<u16, AnalogInError> {
        match self.adc_channel_driver {
            AnalogChannels::Channel0(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel1(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel2(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel3(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel4(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel5(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel6(ref mut channel_driver) => channel_driver.read_raw(),
            AnalogChannels::Channel7(ref mut channel_driver) => channel_driver.read_raw(),
        }
        .map_err(|_| AnalogInError::ErrorReading)
    }
}

impl AnalogSource for AnalogIn<'_> {
    fn read_raw(&mut self) -> Result<u16, AnalogInError> {
        AnalogIn::read_raw(self)
    }

    fn calibrated_millivolts(&mut self) -> Option<u16> {
        self.read_millivolts().ok()
    }
}

fn atten_from(atten: Attenuation) -> adc_atten_t {
    match atten {
        Attenuation::None => attenuation::NONE,
        Attenuation::Low => attenuation::DB_2_5,
        Attenuation::Medium => attenuation::DB_6,
        Attenuation::High => attenuation::DB_11,
    }
}

fn resolution_from(resolution: Resolution) -> AdcResolution {
    match resolution {
        Resolution::Bits9 => AdcResolution::Resolution9Bit,
        Resolution::Bits10 => AdcResolution::Resolution10Bit,
        Resolution::Bits11 => AdcResolution::Resolution11Bit,
        Resolution::Bits12 => AdcResolution::Resolution12Bit,
    }
}
