use esp_idf_svc::sys::{EspError, ESP_ERR_INVALID_ARG, ESP_ERR_INVALID_STATE, ESP_ERR_NOT_FOUND};

use super::sampler_error::AdcDriverError;

/// Maps the error codes returned when creating the ADC driver into an `AdcDriverError`
pub fn map_adc_driver_errors(err: EspError) -> AdcDriverError {
    let code = err.code();
    if code == ESP_ERR_INVALID_STATE as i32 {
        AdcDriverError::AlreadyTaken
    } else if code == ESP_ERR_INVALID_ARG as i32 {
        AdcDriverError::InvalidArgs
    } else if code == ESP_ERR_NOT_FOUND as i32 {
        AdcDriverError::ClockError
    } else {
        AdcDriverError::Other(code)
    }
}
