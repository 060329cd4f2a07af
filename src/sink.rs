// ABOUTME: Per-unit log sinks that receive streamed executor output.
// ABOUTME: Sinks are presentation only; a missing sink never changes an outcome.

use chrono::Local;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::types::UnitId;

/// Append-only destination for executor output, one line at a time.
pub trait LogSink: Send + Sync {
    fn line(&self, unit: &UnitId, text: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn line(&self, _unit: &UnitId, _text: &str) {}
}

/// Appends `[HH:MM:SS][unit] text` lines to a file.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) the log file in append mode, creating parent directories.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn line(&self, unit: &UnitId, text: &str) {
        let stamp = Local::now().format("%H:%M:%S");
        let mut file = self.file.lock();
        if let Err(e) = writeln!(file, "[{stamp}][{unit}] {text}") {
            tracing::warn!("failed to write log line for {}: {}", unit, e);
        }
    }
}

/// Streams lines to stderr, prefixed with the unit id. Used for verbose runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn line(&self, unit: &UnitId, text: &str) {
        eprintln!("[{unit}] {text}");
    }
}

/// Forwards to an inner sink and, when enabled, echoes to the console.
pub struct Echo<S> {
    inner: S,
    echo: bool,
}

impl<S: LogSink> Echo<S> {
    pub fn new(inner: S, echo: bool) -> Self {
        Self { inner, echo }
    }
}

impl<S: LogSink> LogSink for Echo<S> {
    fn line(&self, unit: &UnitId, text: &str) {
        self.inner.line(unit, text);
        if self.echo {
            ConsoleSink.line(unit, text);
        }
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn line(&self, unit: &UnitId, text: &str) {
        (**self).line(unit, text);
    }
}

impl<S: LogSink + ?Sized> LogSink for &S {
    fn line(&self, unit: &UnitId, text: &str) {
        (**self).line(unit, text);
    }
}

/// A sink bound to one unit, handed to the executor for a single call.
#[derive(Clone, Copy)]
pub struct UnitLog<'a> {
    sink: &'a dyn LogSink,
    unit: &'a UnitId,
}

impl<'a> UnitLog<'a> {
    pub fn new(sink: &'a dyn LogSink, unit: &'a UnitId) -> Self {
        Self { sink, unit }
    }

    pub fn unit(&self) -> &UnitId {
        self.unit
    }

    pub fn line(&self, text: &str) {
        self.sink.line(self.unit, text);
    }
}
