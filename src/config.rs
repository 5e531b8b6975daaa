use std::{fmt, time::Duration};

/// GPIO 36 (ADC1_CH0)
pub const ADC_PIN: usize = 36;
/// Reference voltage mapped to the full scale code
pub const VREF: f32 = 3.3;
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);
pub const BAUDRATE: u32 = 115_200;
/// Amount of reads that make up one reading. 1 disables averaging.
pub const SAMPLES_PER_READING: u16 = 1;
/// Spacing between consecutive reads when averaging
pub const AVERAGING_SPACING_US: u32 = 100;

/// Enums the ADC bit widths supported by the ESP32 ADC1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Bits9,
    Bits10,
    Bits11,
    Bits12,
}

impl Resolution {
    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Bits9 => 9,
            Resolution::Bits10 => 10,
            Resolution::Bits11 => 11,
            Resolution::Bits12 => 12,
        }
    }

    /// Maximum code the ADC can report with this resolution, `2^bits - 1`
    pub const fn full_scale(self) -> u16 {
        (1 << self.bits()) - 1
    }
}

/// Enums the input attenuations of the ADC. Higher attenuation widens the
/// input range mapped to the full scale code.
/// - `None`: 0dB
/// - `Low`: 2.5dB
/// - `Medium`: 6dB
/// - `High`: 11dB, 0 to 3.3V
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attenuation {
    None,
    Low,
    Medium,
    High,
}

/// Enums the reasons a `SamplerConfig` can be rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidReferenceVoltage(f32),
    ZeroSamplesPerReading,
    ZeroBaudrate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidReferenceVoltage(vref) => {
                write!(f, "reference voltage must be positive and finite, got {vref}")
            }
            ConfigError::ZeroSamplesPerReading => write!(f, "samples per reading must be at least 1"),
            ConfigError::ZeroBaudrate => write!(f, "baudrate must be greater than 0"),
        }
    }
}

/// Parameters of the sampler. Everything is fixed at compile time through
/// [`SamplerConfig::DEFAULT`]; the `with_*` methods derive variants of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    pub pin: usize,
    pub vref: f32,
    pub resolution: Resolution,
    pub attenuation: Attenuation,
    pub sample_interval: Duration,
    pub baudrate: u32,
    pub samples_per_reading: u16,
}

impl SamplerConfig {
    pub const DEFAULT: SamplerConfig = SamplerConfig {
        pin: ADC_PIN,
        vref: VREF,
        resolution: Resolution::Bits12,
        attenuation: Attenuation::High,
        sample_interval: SAMPLE_INTERVAL,
        baudrate: BAUDRATE,
        samples_per_reading: SAMPLES_PER_READING,
    };

    pub const fn with_samples_per_reading(mut self, samples: u16) -> Self {
        self.samples_per_reading = samples;
        self
    }

    pub const fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub const fn with_vref(mut self, vref: f32) -> Self {
        self.vref = vref;
        self
    }

    pub fn full_scale(&self) -> u16 {
        self.resolution.full_scale()
    }

    /// Checks the configuration can drive a sampler.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidReferenceVoltage`: If `vref` is not a positive finite number
    /// - `ConfigError::ZeroSamplesPerReading`: If `samples_per_reading` is 0
    /// - `ConfigError::ZeroBaudrate`: If `baudrate` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.vref.is_finite() || self.vref <= 0.0 {
            return Err(ConfigError::InvalidReferenceVoltage(self.vref));
        }
        if self.samples_per_reading == 0 {
            return Err(ConfigError::ZeroSamplesPerReading);
        }
        if self.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test0_default_matches_reference_board_setup() {
        let config = SamplerConfig::default();
        assert_eq!(config.pin, 36);
        assert_eq!(config.baudrate, 115_200);
        assert_eq!(config.full_scale(), 4095);
        assert_eq!(config.attenuation, Attenuation::High);
        assert_eq!(config.sample_interval, Duration::from_millis(100));
        assert_eq!(config.samples_per_reading, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test1_full_scale_follows_resolution() {
        assert_eq!(Resolution::Bits9.full_scale(), 511);
        assert_eq!(Resolution::Bits10.full_scale(), 1023);
        assert_eq!(Resolution::Bits11.full_scale(), 2047);
        assert_eq!(Resolution::Bits12.full_scale(), 4095);
    }

    #[test]
    fn test2_invalid_configurations_are_rejected() {
        let zero_samples = SamplerConfig::DEFAULT.with_samples_per_reading(0);
        assert_eq!(zero_samples.validate(), Err(ConfigError::ZeroSamplesPerReading));

        let negative_vref = SamplerConfig::DEFAULT.with_vref(-1.0);
        assert_eq!(
            negative_vref.validate(),
            Err(ConfigError::InvalidReferenceVoltage(-1.0))
        );
        assert!(SamplerConfig::DEFAULT.with_vref(f32::NAN).validate().is_err());

        let mut no_baud = SamplerConfig::DEFAULT;
        no_baud.baudrate = 0;
        assert_eq!(no_baud.validate(), Err(ConfigError::ZeroBaudrate));
    }
}
