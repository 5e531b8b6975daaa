//! Reads the voltage on GPIO 36 every 100ms and prints it with three decimals
//! on UART0 at 115_200 baud, one reading per line.
//!
//! On a development host the same loop runs against a simulated ramp on the
//! ADC and prints to stdout.

use voltage_reader::{config::SamplerConfig, sampler::VoltageSampler};

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_svc::hal::delay::Delay;
    use voltage_reader::{
        sampler_error::SamplerError,
        serial::{Parity, StopBit},
        Microcontroller,
    };

    /// UART0 is the port wired to the USB bridge of the dev boards
    const UART_NUM: usize = 0;
    const TX_PIN: usize = 1;
    const RX_PIN: usize = 3;

    let mut micro = Microcontroller::take();
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = SamplerConfig::DEFAULT;
    let uart = micro
        .set_pins_for_uart(TX_PIN, RX_PIN, UART_NUM, config.baudrate, Parity::None, StopBit::One)
        .map_err(SamplerError::from)?;
    let analog_in = micro
        .set_pin_as_analog_in(config.pin, config.attenuation, config.resolution)
        .map_err(SamplerError::from)?;

    let mut sampler = VoltageSampler::new(analog_in, uart, Delay::new_default(), config)?;
    sampler.run()
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use voltage_reader::{
        serial::IoLineWriter,
        simulation::{SimulatedAdc, StdDelay},
    };

    const RAMP_STEP: u16 = 64;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SamplerConfig::DEFAULT;
    let adc = SimulatedAdc::ramp(config.resolution, RAMP_STEP);
    let stdout = IoLineWriter::new(std::io::stdout());

    let mut sampler = VoltageSampler::new(adc, stdout, StdDelay, config)?;
    sampler.run()
}
