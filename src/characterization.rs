//! Host side comparison of the voltages reported by the firmware against
//! voltages measured with an independent instrument.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use chrono::{DateTime, TimeZone};

const MAX_INPUT_LEN: usize = 5;
const MAX_MEASURED_VOLTAGE: f32 = 999.0;
const END_COMMAND: &str = "end";
const CSV_HEADER: &str = "Timestamp,Measured Voltage (V),Serial Voltage (V),Difference (V)";
const CSV_LINE_TERMINATOR: &str = "\r\n";
const CLOCK_FORMAT: &str = "%H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What the operator typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasuredInput {
    Voltage(f32),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputError {
    InvalidFormat,
    NotANumber,
    OutOfRange(f32),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidFormat => write!(
                f,
                "Please enter a valid number of up to {MAX_INPUT_LEN} characters (e.g. 3.30, 12.5, 100) or '{END_COMMAND}' to save and exit"
            ),
            InputError::NotANumber => write!(f, "Please enter a valid number"),
            InputError::OutOfRange(_) => {
                write!(f, "Please enter a voltage between 0 and {MAX_MEASURED_VOLTAGE}V")
            }
        }
    }
}

/// Parses a measured voltage typed by the operator. Accepts `end` in any case, or a
/// number of at most 5 characters made of digits, `.` and `-` within [0, 999].
///
/// # Errors
///
/// - `InputError::InvalidFormat`: If the input is too long or has other characters
/// - `InputError::NotANumber`: If the characters do not form a number, e.g. `1.2.3`
/// - `InputError::OutOfRange`: If the number is negative or above 999
pub fn parse_measured_input(input: &str) -> Result<MeasuredInput, InputError> {
    let input = input.trim().to_lowercase();
    if input == END_COMMAND {
        return Ok(MeasuredInput::End);
    }
    let has_digits = input.chars().any(|c| c.is_ascii_digit());
    let only_number_chars = input.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if input.len() > MAX_INPUT_LEN || !has_digits || !only_number_chars {
        return Err(InputError::InvalidFormat);
    }
    let voltage: f32 = input.parse().map_err(|_| InputError::NotANumber)?;
    if !(0.0..=MAX_MEASURED_VOLTAGE).contains(&voltage) {
        return Err(InputError::OutOfRange(voltage));
    }
    Ok(MeasuredInput::Voltage(voltage))
}

/// Parses one line of the firmware output into volts. Lines that are not a
/// finite number, like boot messages, give `None`.
pub fn parse_reading_line(line: &str) -> Option<f32> {
    line.trim().parse::<f32>().ok().filter(|volts| volts.is_finite())
}

/// Reads the firmware output one line at a time, skipping anything that is not a reading.
///
/// The stream is assumed to start at an arbitrary point of the output, as a freshly opened
/// serial port does, so everything up to the first newline is dropped. Read timeouts are
/// retried without losing the part of the line already received.
pub struct ReadingStream<R: BufRead> {
    inner: R,
    line: Vec<u8>,
    synced: bool,
}

impl<R: BufRead> ReadingStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            synced: false,
        }
    }

    /// Returns the next complete line that parses as a voltage, or `None` once the stream ends.
    ///
    /// # Errors
    ///
    /// Any error of the underlying reader other than `io::ErrorKind::TimedOut`
    pub fn next_reading(&mut self) -> io::Result<Option<f32>> {
        loop {
            match self.inner.read_until(b'\n', &mut self.line) {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::TimedOut => continue,
                Err(err) => return Err(err),
            }
            let line = String::from_utf8_lossy(&self.line).trim().to_string();
            self.line.clear();
            if !self.synced {
                self.synced = true;
                log::debug!("Dropping partial line: {line:?}");
                continue;
            }
            log::info!("Received: {line}");
            match parse_reading_line(&line) {
                Some(volts) => return Ok(Some(volts)),
                None => log::info!("Not a valid number, continuing to read..."),
            }
        }
    }
}

/// `HH:MM:SS` of `time`, the timestamp of a comparison row
pub fn clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    time.format(CLOCK_FORMAT).to_string()
}

/// One measurement: what the instrument read against what the firmware reported
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub timestamp: String,
    pub measured: f32,
    pub reported: f32,
}

impl Comparison {
    pub fn new(timestamp: String, measured: f32, reported: f32) -> Self {
        Self {
            timestamp,
            measured,
            reported,
        }
    }

    /// Error of the firmware, positive when it reports more than the instrument
    pub fn difference(&self) -> f32 {
        self.reported - self.measured
    }

    pub fn csv_row(&self) -> String {
        format!(
            "{},{:.3},{:.3},{:+.3}",
            self.timestamp,
            self.measured,
            self.reported,
            self.difference()
        )
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] Serial: {:.3}V | Measured: {:.3}V | Difference: {:+.3}V",
            self.timestamp,
            self.reported,
            self.measured,
            self.difference()
        )
    }
}

/// Name of the file a session saved at `time` is written to
pub fn csv_file_name<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("voltage_comparison_{}.csv", time.format(FILE_STAMP_FORMAT))
}

/// Writes the header and one row per comparison
///
/// # Errors
///
/// Any error of `out`
pub fn write_csv<W: Write>(comparisons: &[Comparison], mut out: W) -> io::Result<()> {
    write!(out, "{CSV_HEADER}{CSV_LINE_TERMINATOR}")?;
    for comparison in comparisons {
        write!(out, "{}{CSV_LINE_TERMINATOR}", comparison.csv_row())?;
    }
    out.flush()
}
