//! Compares the voltages printed by the firmware with voltages measured on a
//! multimeter, one measurement at a time, and saves the comparison as CSV.
//!
//! Usage: `characterize <serial-device>`
//!
//! The port is opened at 115_200 baud, 8N1, and reopened for every measurement
//! so the reading taken is a fresh one. Every line received is logged at `info`;
//! `RUST_LOG=debug` also shows the partial line dropped after opening the port.

#[cfg(target_os = "espidf")]
fn main() {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::error!("characterize runs on the computer the board is plugged into");
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::{
        fs::File,
        io::{self, BufRead, BufReader, BufWriter, Write},
        time::Duration,
    };

    use anyhow::Context;
    use chrono::Local;
    use serialport::{DataBits, Parity, StopBits};
    use voltage_reader::{
        characterization::{
            clock, csv_file_name, parse_measured_input, write_csv, Comparison, MeasuredInput, ReadingStream,
        },
        config::BAUDRATE,
    };

    const SEPARATOR_WIDTH: usize = 60;
    const READ_TIMEOUT: Duration = Duration::from_secs(1);

    fn read_one_voltage(device: &str) -> anyhow::Result<Option<f32>> {
        let port = serialport::new(device, BAUDRATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("opening {device} at {BAUDRATE} baud"))?;
        Ok(ReadingStream::new(BufReader::new(port)).next_reading()?)
    }

    fn save(comparisons: &[Comparison]) -> anyhow::Result<()> {
        let file_name = csv_file_name(&Local::now());
        let file = File::create(&file_name).with_context(|| format!("creating {file_name}"))?;
        write_csv(comparisons, BufWriter::new(file)).with_context(|| format!("writing {file_name}"))?;
        println!("✓ Data saved to {file_name}");
        println!("✓ Total measurements: {}", comparisons.len());
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let device = std::env::args()
            .nth(1)
            .context("usage: characterize <serial-device>")?;

        println!("=== ESP32 ADC characterization ===");
        println!("Compares the voltage measured on a multimeter with the one reported on {device}");
        println!("Type 'end' to save the data to CSV and exit, or close the input to exit without saving");
        println!("{}", "-".repeat(SEPARATOR_WIDTH));

        let mut comparisons = Vec::new();
        let mut input = io::stdin().lock().lines();
        loop {
            print!("\nEnter measured voltage (e.g. 3.30) or 'end' to save and exit: ");
            io::stdout().flush()?;

            let Some(line) = input.next() else {
                println!("\nExiting without saving...");
                return Ok(());
            };
            let measured = match parse_measured_input(&line?) {
                Ok(MeasuredInput::Voltage(measured)) => measured,
                Ok(MeasuredInput::End) => break,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };

            println!("Reading {device} for measured voltage: {measured:.3}V");
            match read_one_voltage(&device) {
                Ok(Some(reported)) => {
                    let comparison = Comparison::new(clock(&Local::now()), measured, reported);
                    println!("{comparison}");
                    comparisons.push(comparison);
                    println!("✓ Voltage comparison completed and stored");
                }
                Ok(None) => println!("✗ {device} closed before a voltage was read"),
                Err(err) => println!("✗ Failed to read voltage from {device}: {err:#}"),
            }
            println!("{}", "-".repeat(SEPARATOR_WIDTH));
        }

        if comparisons.is_empty() {
            println!("No data to save.");
            return Ok(());
        }
        println!("\nSaving {} measurements to CSV...", comparisons.len());
        save(&comparisons)
    }
}
