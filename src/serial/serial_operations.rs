use std::io::{self, Write};

/// Errors of a serial transport
#[derive(Debug)]
pub enum SerialError {
    Io(io::ErrorKind),
    TransportUnavailable,
    WriteError,
}

/// Trait for transports that carry text one line at a time.
pub trait LineWriter {
    /// Writes `line` followed by the line terminator of the transport.
    fn write_line(&mut self, line: &str) -> Result<(), SerialError>;
}

impl<L: LineWriter + ?Sized> LineWriter for &mut L {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        (**self).write_line(line)
    }
}

/// Adapts any `std::io::Write` into a `LineWriter` using `\n` as terminator.
/// Every line is flushed as soon as it is written.
pub struct IoLineWriter<W: Write> {
    inner: W,
}

impl<W: Write> IoLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> LineWriter for IoLineWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        writeln!(self.inner, "{line}")?;
        self.inner.flush()?;
        Ok(())
    }
}

impl From<io::Error> for SerialError {
    fn from(value: io::Error) -> Self {
        match value.kind() {
            io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected => SerialError::TransportUnavailable,
            kind => SerialError::Io(kind),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test0_lines_are_newline_terminated() {
        let mut writer = IoLineWriter::new(Vec::new());
        writer.write_line("1.650").unwrap();
        writer.write_line("3.300").unwrap();
        assert_eq!(writer.into_inner(), b"1.650\n3.300\n");
    }

    #[test]
    fn test1_closed_transport_is_reported_as_unavailable() {
        let mut writer = IoLineWriter::new(ClosedPipe);
        assert!(matches!(
            writer.write_line("0.000"),
            Err(SerialError::TransportUnavailable)
        ));
    }
}
