use std::fmt;

use crate::{config::SamplerConfig, utils::sampler_error::SamplerError};

/// A voltage computed from one reading. Its `Display` prints the value with
/// exactly three fractional digits, which is the format of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct VoltageReading {
    pub raw: u16,
    pub volts: f32,
}

impl fmt::Display for VoltageReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.volts)
    }
}

/// Scales a raw ADC code linearly into volts: `raw * vref / full_scale`.
///
/// # Errors
///
/// - `SamplerError::OutOfRange`: If `raw` is above the full scale code of the configured resolution
pub fn to_voltage(raw: u16, config: &SamplerConfig) -> Result<VoltageReading, SamplerError> {
    let full_scale = config.full_scale();
    if raw > full_scale {
        return Err(SamplerError::OutOfRange { raw, full_scale });
    }
    let volts = (raw as f32 * config.vref) / full_scale as f32;
    Ok(VoltageReading { raw, volts })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Resolution;

    fn printed(raw: u16) -> String {
        to_voltage(raw, &SamplerConfig::DEFAULT).unwrap().to_string()
    }

    #[test]
    fn test0_boundaries_print_zero_and_vref() {
        assert_eq!(printed(0), "0.000");
        assert_eq!(printed(4095), "3.300");
    }

    #[test]
    fn test1_mid_scale_values() {
        // 2048 * 3.3 / 4095 = 1.65040...
        assert_eq!(printed(2048), "1.650");
        assert_eq!(printed(2049), "1.651");
        assert_eq!(printed(1), "0.001");
        assert_eq!(printed(1241), "1.000");
        assert_eq!(printed(4094), "3.299");
    }

    #[test]
    fn test2_every_code_follows_the_transfer_function() {
        for raw in 0..=4095u16 {
            let reading = to_voltage(raw, &SamplerConfig::DEFAULT).unwrap();
            let expected = raw as f64 * 3.3 / 4095.0;
            assert!(
                (reading.volts as f64 - expected).abs() < 1e-5,
                "raw {raw} gave {} instead of {expected}",
                reading.volts
            );
        }
    }

    #[test]
    fn test3_transfer_function_is_monotonic() {
        let mut previous = to_voltage(0, &SamplerConfig::DEFAULT).unwrap().volts;
        for raw in 1..=4095u16 {
            let current = to_voltage(raw, &SamplerConfig::DEFAULT).unwrap().volts;
            assert!(previous <= current, "voltage decreased at raw {raw}");
            previous = current;
        }
    }

    #[test]
    fn test4_same_code_prints_identically() {
        assert_eq!(printed(3000), printed(3000));
    }

    #[test]
    fn test5_codes_above_full_scale_are_out_of_range() {
        let config = SamplerConfig::DEFAULT.with_resolution(Resolution::Bits10);
        assert_eq!(to_voltage(1023, &config).unwrap().to_string(), "3.300");
        match to_voltage(1024, &config) {
            Err(SamplerError::OutOfRange { raw, full_scale }) => {
                assert_eq!(raw, 1024);
                assert_eq!(full_scale, 1023);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test6_every_code_prints_like_the_exact_formula() {
        for raw in 0..=4095u16 {
            assert_eq!(printed(raw), format!("{:.3}", raw as f64 * 3.3 / 4095.0), "raw {raw}");
        }
    }
}
