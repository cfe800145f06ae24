//! Command sinks
//!
//! A sink receives finished command lines, one call per line, in output order.

use std::io::{self, Write};

/// Destination for emitted command lines
pub trait CommandSink {
    /// Append one line; the sink adds the line terminator
    fn emit(&mut self, line: &str) -> io::Result<()>;

    /// Push buffered lines to the underlying destination
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        (**self).emit(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Collects lines in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// All lines joined with `\n`, with a trailing newline
    pub fn text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl CommandSink for MemorySink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// Writes lines to any [`Write`], optionally echoing them to a console stream
pub struct WriterSink<W: Write> {
    writer: W,
    echo: Option<Box<dyn Write + Send>>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, echo: None }
    }

    /// Echo every line to stdout as well
    pub fn echo_stdout(self) -> Self {
        self.echo_to(io::stdout())
    }

    /// Echo every line to the given writer as well
    pub fn echo_to(mut self, echo: impl Write + Send + 'static) -> Self {
        self.echo = Some(Box::new(echo));
        self
    }

    pub fn is_echoing(&self) -> bool {
        self.echo.is_some()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        if let Some(echo) = self.echo.as_mut() {
            writeln!(echo, "{}", line)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        if let Some(echo) = self.echo.as_mut() {
            echo.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink")
            .field("echo", &self.echo.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.emit("G90").unwrap();
        sink.emit("G1 X1").unwrap();
        assert_eq!(sink.lines(), &["G90".to_string(), "G1 X1".to_string()]);
        assert_eq!(sink.text(), "G90\nG1 X1\n");
    }

    #[test]
    fn test_writer_sink_appends_newlines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("G91").unwrap();
        sink.emit("G1 Y10").unwrap();
        sink.flush().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "G91\nG1 Y10\n");
    }

    #[test]
    fn test_writer_sink_echo() {
        let console = SharedBuf::default();
        let mut sink = WriterSink::new(Vec::new()).echo_to(console.clone());
        assert!(sink.is_echoing());
        sink.emit("G4 P1").unwrap();

        assert_eq!(sink.get_ref().as_slice(), b"G4 P1\n");
        assert_eq!(console.0.lock().unwrap().as_slice(), b"G4 P1\n");
    }
}
