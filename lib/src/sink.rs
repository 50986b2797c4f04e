//! Destinations for formatted log records.
//!
//! Sinks are handed to [`crate::LogContext::with_sinks`] rather than configured
//! globally, so tests can swap the files for a [`MemorySink`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// The three destinations a [`crate::LogContext`] writes to.
pub struct LogSinks {
    /// Receives records less severe than ERROR.
    pub info: BoxMakeWriter,
    /// Receives ERROR records.
    pub error: BoxMakeWriter,
    /// Receives every record that passes the thresholds.
    pub console: Option<BoxMakeWriter>,
}

impl LogSinks {
    pub fn new<I, E>(info: I, error: E) -> Self
    where
        I: for<'a> MakeWriter<'a> + Send + Sync + 'static,
        E: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            info: BoxMakeWriter::new(info),
            error: BoxMakeWriter::new(error),
            console: None,
        }
    }

    pub fn with_console<C>(mut self, console: C) -> Self
    where
        C: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        self.console = Some(BoxMakeWriter::new(console));
        self
    }
}

/// Opens `path` for appending, creating it when absent. Existing content is kept.
pub fn append_file(path: &Path) -> io::Result<Mutex<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Mutex::new(file))
}

/// Shared in-memory buffer usable as a log destination.
///
/// Clones share the same buffer, so a test keeps one clone and hands the
/// other to [`LogSinks`].
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemorySink {
    type Writer = MemorySink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
