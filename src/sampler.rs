use embedded_hal::delay::DelayNs;

use crate::{
    config::{SamplerConfig, AVERAGING_SPACING_US},
    gpio::AnalogSource,
    serial::LineWriter,
    utils::sampler_error::SamplerError,
    voltage::{to_voltage, VoltageReading},
};

/// Polls an analog source and reports every reading as one line on a serial
/// transport: read, convert to volts, write, wait, forever.
///
/// - `source`: Where the raw ADC codes come from
/// - `writer`: Transport receiving one line per reading
/// - `delay`: Provider of the blocking pauses between readings
/// - `config`: Validated sampler configuration
pub struct VoltageSampler<S, W, D> {
    source: S,
    writer: W,
    delay: D,
    config: SamplerConfig,
}

impl<S, W, D> VoltageSampler<S, W, D>
where
    S: AnalogSource,
    W: LineWriter,
    D: DelayNs,
{
    /// Creates a sampler that owns its ADC source, transport and delay.
    ///
    /// # Errors
    ///
    /// - `SamplerError::Config`: If `config` does not pass [SamplerConfig::validate]
    pub fn new(source: S, writer: W, delay: D, config: SamplerConfig) -> Result<Self, SamplerError> {
        config.validate()?;
        log::debug!(
            "Sampling pin {} every {:?}: {} bits, {:?} attenuation, vref {}V, {} sample(s) per reading",
            config.pin,
            config.sample_interval,
            config.resolution.bits(),
            config.attenuation,
            config.vref,
            config.samples_per_reading
        );
        Ok(VoltageSampler {
            source,
            writer,
            delay,
            config,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Reads one raw code. When averaging is enabled, `samples_per_reading` codes
    /// are read `AVERAGING_SPACING_US` apart and their integer mean is returned.
    ///
    /// # Errors
    ///
    /// - `SamplerError::AnalogIn`: If any of the reads fails
    pub fn read_raw(&mut self) -> Result<u16, SamplerError> {
        let samples = self.config.samples_per_reading;
        if samples == 1 {
            return Ok(self.source.read_raw()?);
        }
        let mut sum: u32 = 0;
        for _ in 0..samples {
            sum += self.source.read_raw()? as u32;
            self.delay.delay_us(AVERAGING_SPACING_US);
        }
        Ok((sum / samples as u32) as u16)
    }

    fn sample(&mut self) -> Result<VoltageReading, SamplerError> {
        let raw = self.read_raw()?;
        let reading = to_voltage(raw, &self.config)?;
        self.writer.write_line(&reading.to_string())?;
        if log::log_enabled!(log::Level::Debug) {
            match self.source.calibrated_millivolts() {
                Some(millivolts) => log::debug!("raw {raw} -> {reading}V, calibrated {millivolts}mV"),
                None => log::debug!("raw {raw} -> {reading}V"),
            }
        }
        Ok(reading)
    }

    fn pause(&mut self) {
        let micros = u32::try_from(self.config.sample_interval.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(micros);
    }

    /// Runs one read-convert-write-wait cycle and returns the reading written.
    /// The wait happens whether the cycle succeeded or not.
    ///
    /// # Errors
    ///
    /// - `SamplerError::AnalogIn`: If the ADC could not be read
    /// - `SamplerError::OutOfRange`: If the code read is above the full scale value
    /// - `SamplerError::Serial`: If the line could not be written
    pub fn cycle(&mut self) -> Result<VoltageReading, SamplerError> {
        let result = self.sample();
        self.pause();
        result
    }

    /// Runs `cycles` cycles and returns the readings of the ones that succeeded.
    /// Failed cycles are logged and skipped.
    pub fn run_cycles(&mut self, cycles: usize) -> Vec<VoltageReading> {
        (0..cycles).filter_map(|_| self.logged_cycle()).collect()
    }

    /// Samples forever. Failed cycles are logged and skipped.
    pub fn run(&mut self) -> ! {
        loop {
            self.logged_cycle();
        }
    }

    fn logged_cycle(&mut self) -> Option<VoltageReading> {
        self.cycle()
            .map_err(|err| log::warn!("Sampling cycle failed: {err}"))
            .ok()
    }

    /// Gives back the source, transport and delay owned by the sampler
    pub fn release(self) -> (S, W, D) {
        (self.source, self.writer, self.delay)
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::{Mutex, Once},
        time::{Duration, Instant},
    };

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::*;
    use crate::{
        gpio::AnalogInError,
        serial::{IoLineWriter, SerialError},
        simulation::{SimulatedAdc, StdDelay},
    };

    /// Delay that only records the requested time
    #[derive(Default)]
    struct RecordingDelay {
        pauses_ns: Vec<u64>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.pauses_ns.push(ns as u64);
        }

        fn delay_us(&mut self, us: u32) {
            self.pauses_ns.push(us as u64 * 1_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.pauses_ns.push(ms as u64 * 1_000_000);
        }
    }

    /// Logger keeping every record, so tests can look at what was logged and at which level
    struct CapturingLogger;

    static RECORDS: Mutex<Vec<(Level, String, String)>> = Mutex::new(Vec::new());
    static LOGGER: CapturingLogger = CapturingLogger;

    impl Log for CapturingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let entry = (record.level(), record.target().to_string(), record.args().to_string());
            RECORDS.lock().unwrap().push(entry);
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Debug);
        });
    }

    fn logged(level: Level, text: &str) -> bool {
        RECORDS
            .lock()
            .unwrap()
            .iter()
            .any(|(record_level, _, message)| *record_level == level && message.contains(text))
    }

    /// Source with a calibration scheme reporting a fixed amount of millivolts
    struct CalibratedAdc {
        raw: u16,
        millivolts: u16,
    }

    impl AnalogSource for CalibratedAdc {
        fn read_raw(&mut self) -> Result<u16, AnalogInError> {
            Ok(self.raw)
        }

        fn calibrated_millivolts(&mut self) -> Option<u16> {
            Some(self.millivolts)
        }
    }

    /// Source that fails on the reads listed in `failing_reads`
    struct FlakyAdc {
        value: u16,
        reads: usize,
        failing_reads: Vec<usize>,
    }

    impl AnalogSource for FlakyAdc {
        fn read_raw(&mut self) -> Result<u16, AnalogInError> {
            let read = self.reads;
            self.reads += 1;
            if self.failing_reads.contains(&read) {
                return Err(AnalogInError::ErrorReading);
            }
            Ok(self.value)
        }
    }

    struct DisconnectedTransport;

    impl LineWriter for DisconnectedTransport {
        fn write_line(&mut self, _line: &str) -> Result<(), SerialError> {
            Err(SerialError::TransportUnavailable)
        }
    }

    fn sampler_with(
        codes: Vec<u16>,
        config: SamplerConfig,
    ) -> VoltageSampler<SimulatedAdc, IoLineWriter<Vec<u8>>, RecordingDelay> {
        VoltageSampler::new(
            SimulatedAdc::from_codes(codes),
            IoLineWriter::new(Vec::new()),
            RecordingDelay::default(),
            config,
        )
        .unwrap()
    }

    fn output_of(sampler: VoltageSampler<SimulatedAdc, IoLineWriter<Vec<u8>>, RecordingDelay>) -> String {
        let (_, writer, _) = sampler.release();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test0_one_line_per_cycle_with_three_decimals() {
        let mut sampler = sampler_with(vec![0, 2049, 4095], SamplerConfig::DEFAULT);
        let readings = sampler.run_cycles(3);
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[1].raw, 2049);
        assert_eq!(output_of(sampler), "0.000\n1.651\n3.300\n");
    }

    #[test]
    fn test1_every_cycle_waits_the_sample_interval() {
        let mut sampler = sampler_with(vec![100], SamplerConfig::DEFAULT);
        sampler.run_cycles(4);
        let (_, _, delay) = sampler.release();
        assert_eq!(delay.pauses_ns, vec![100_000_000; 4]);
    }

    #[test]
    fn test2_same_input_gives_identical_lines() {
        let mut sampler = sampler_with(vec![1234], SamplerConfig::DEFAULT);
        sampler.run_cycles(2);
        let output = output_of(sampler);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
    }

    #[test]
    fn test3_averaging_uses_integer_mean_and_spacing() {
        let config = SamplerConfig::DEFAULT.with_samples_per_reading(100);
        let mut sampler = sampler_with(vec![4095, 0], config);
        assert_eq!(sampler.read_raw().unwrap(), 2047);
        let (_, _, delay) = sampler.release();
        assert_eq!(delay.pauses_ns.len(), 100);
        assert!(delay.pauses_ns.iter().all(|&ns| ns == 100_000));
    }

    #[test]
    fn test4_averaged_cycle_prints_mean_voltage() {
        let config = SamplerConfig::DEFAULT.with_samples_per_reading(4);
        let mut sampler = sampler_with(vec![2000, 2002, 2000, 2002], config);
        let reading = sampler.cycle().unwrap();
        assert_eq!(reading.raw, 2001);
        assert_eq!(output_of(sampler), "1.613\n");
    }

    #[test]
    fn test5_out_of_range_code_is_skipped_but_still_paced() {
        let mut sampler = sampler_with(vec![5000, 4095], SamplerConfig::DEFAULT);
        assert!(matches!(
            sampler.cycle(),
            Err(SamplerError::OutOfRange { raw: 5000, full_scale: 4095 })
        ));
        assert!(sampler.cycle().is_ok());
        let (_, writer, delay) = sampler.release();
        assert_eq!(writer.into_inner(), b"3.300\n");
        assert_eq!(delay.pauses_ns.len(), 2);
    }

    #[test]
    fn test6_failed_reads_do_not_stop_the_loop() {
        let source = FlakyAdc {
            value: 4095,
            reads: 0,
            failing_reads: vec![1, 2],
        };
        let mut sampler = VoltageSampler::new(
            source,
            IoLineWriter::new(Vec::new()),
            RecordingDelay::default(),
            SamplerConfig::DEFAULT,
        )
        .unwrap();
        let readings = sampler.run_cycles(4);
        assert_eq!(readings.len(), 2);
        let (_, writer, delay) = sampler.release();
        assert_eq!(writer.into_inner(), b"3.300\n3.300\n");
        assert_eq!(delay.pauses_ns.len(), 4);
    }

    #[test]
    fn test7_unavailable_transport_is_reported() {
        let mut sampler = VoltageSampler::new(
            SimulatedAdc::from_codes(vec![10]),
            DisconnectedTransport,
            RecordingDelay::default(),
            SamplerConfig::DEFAULT,
        )
        .unwrap();
        assert!(matches!(
            sampler.cycle(),
            Err(SamplerError::Serial(SerialError::TransportUnavailable))
        ));
    }

    #[test]
    fn test8_invalid_config_is_rejected_at_startup() {
        let result = VoltageSampler::new(
            SimulatedAdc::from_codes(vec![0]),
            IoLineWriter::new(Vec::new()),
            RecordingDelay::default(),
            SamplerConfig::DEFAULT.with_samples_per_reading(0),
        );
        assert!(matches!(result, Err(SamplerError::Config(_))));
    }

    #[test]
    fn test9_lines_are_at_least_one_interval_apart() {
        let mut sampler = VoltageSampler::new(
            SimulatedAdc::from_codes(vec![0, 4095]),
            IoLineWriter::new(Vec::new()),
            StdDelay,
            SamplerConfig::DEFAULT,
        )
        .unwrap();
        let start = Instant::now();
        let readings = sampler.run_cycles(3);
        assert_eq!(readings.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test10_startup_stays_out_of_the_reading_stream() {
        capture_logs();
        let config = SamplerConfig::DEFAULT.with_vref(2.5);
        let _sampler = VoltageSampler::new(
            SimulatedAdc::from_codes(vec![0]),
            IoLineWriter::new(Vec::new()),
            RecordingDelay::default(),
            config,
        )
        .unwrap();
        assert!(logged(Level::Debug, "vref 2.5V"));
        let records = RECORDS.lock().unwrap();
        assert!(!records
            .iter()
            .any(|(level, target, _)| *level == Level::Info && target == "voltage_reader::sampler"));
    }

    #[test]
    fn test11_calibrated_millivolts_are_logged_next_to_the_raw_code() {
        capture_logs();
        let source = CalibratedAdc {
            raw: 2049,
            millivolts: 1637,
        };
        let mut sampler = VoltageSampler::new(
            source,
            IoLineWriter::new(Vec::new()),
            RecordingDelay::default(),
            SamplerConfig::DEFAULT,
        )
        .unwrap();
        sampler.cycle().unwrap();
        assert!(logged(Level::Debug, "raw 2049 -> 1.651V, calibrated 1637mV"));
        let (_, writer, _) = sampler.release();
        assert_eq!(writer.into_inner(), b"1.651\n");
    }
}
