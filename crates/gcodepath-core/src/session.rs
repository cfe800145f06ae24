//! Output sessions
//!
//! A session opens the output destination, writes the optional header file,
//! hands out the [`MotionEngine`] and writes the optional footer file when it
//! is finished.

use crate::dialect::Dialect;
use crate::engine::MotionEngine;
use crate::error::{Error, Result};
use crate::sink::{CommandSink, WriterSink};
use std::fs::File;
use std::io::BufWriter;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// How a session is set up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    /// Opcode vocabulary for the engine
    pub dialect: Dialect,
    /// File copied to the top of the output
    pub header: Option<PathBuf>,
    /// File copied to the bottom of the output
    pub footer: Option<PathBuf>,
    /// Echo every line to stdout. Only [`Session::create`] applies this;
    /// [`Session::with_sink`] writes to the sink exactly as given.
    pub echo: bool,
}

/// Sink used by [`Session::create`]
pub type FileSink = WriterSink<BufWriter<File>>;

/// A motion engine bracketed by header and footer files
#[derive(Debug)]
pub struct Session<S: CommandSink> {
    engine: MotionEngine<S>,
    footer: Option<PathBuf>,
}

impl Session<FileSink> {
    /// Create (or truncate) `path` and start a session writing to it
    pub fn create(path: impl AsRef<Path>, options: SessionOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut sink = WriterSink::new(BufWriter::new(file));
        if options.echo {
            sink = sink.echo_stdout();
        }
        tracing::info!(path = %path.display(), dialect = %options.dialect.name, "opening session");
        Self::with_sink(sink, options)
    }
}

impl<S: CommandSink> Session<S> {
    /// Start a session on an existing sink, writing the header first.
    ///
    /// `options.echo` is ignored here; give a [`WriterSink`] an echo target
    /// with [`WriterSink::echo_stdout`] before passing it in.
    pub fn with_sink(sink: S, options: SessionOptions) -> Result<Self> {
        if options.echo {
            tracing::warn!("echo requested on a caller-supplied sink; ignoring");
        }
        let mut engine = MotionEngine::with_dialect(sink, options.dialect);
        if let Some(header) = options.header.as_deref() {
            copy_file_lines(&mut engine, header)?;
        }
        Ok(Self {
            engine,
            footer: options.footer,
        })
    }

    pub fn engine(&mut self) -> &mut MotionEngine<S> {
        &mut self.engine
    }

    /// Write the footer, flush and give back the sink
    pub fn finish(mut self) -> Result<S> {
        if let Some(footer) = self.footer.take() {
            copy_file_lines(&mut self.engine, &footer)?;
        }
        self.engine.flush()?;
        tracing::info!(position = %self.engine.position(), "session finished");
        Ok(self.engine.into_sink())
    }
}

impl<S: CommandSink> Deref for Session<S> {
    type Target = MotionEngine<S>;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

impl<S: CommandSink> DerefMut for Session<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.engine
    }
}

fn copy_file_lines<S: CommandSink>(engine: &mut MotionEngine<S>, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "copying file into output");
    for line in content.lines() {
        engine.write_raw(line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_session_without_files() {
        let mut session = Session::with_sink(MemorySink::new(), SessionOptions::default()).unwrap();
        session.comment("hello").unwrap();
        let sink = session.finish().unwrap();
        assert_eq!(sink.lines(), &["; hello".to_string()]);
    }

    #[test]
    fn test_with_sink_leaves_echo_to_the_sink() {
        let options = SessionOptions {
            echo: true,
            ..Default::default()
        };
        let mut session = Session::with_sink(MemorySink::new(), options).unwrap();
        session.relative().unwrap();
        let sink = session.finish().unwrap();
        assert_eq!(sink.lines(), &["G91".to_string()]);
    }

    #[test]
    fn test_echo_via_writer_sink() {
        let echoed = Arc::new(Mutex::new(Vec::new()));
        let sink = WriterSink::new(Vec::new()).echo_to(SharedBuffer(echoed.clone()));
        let mut session = Session::with_sink(sink, SessionOptions::default()).unwrap();
        session.comment("hi").unwrap();
        let out = session.finish().unwrap().into_inner();
        assert_eq!(out, b"; hi\n");
        assert_eq!(*echoed.lock().unwrap(), b"; hi\n");
    }

    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_header_is_io_error() {
        let options = SessionOptions {
            header: Some(PathBuf::from("/definitely/not/here.gcode")),
            ..Default::default()
        };
        let err = Session::with_sink(MemorySink::new(), options).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
