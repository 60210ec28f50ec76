// src/core/report.rs
use crate::models::Progress;
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Receives the human-readable lines a job produces.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

/// Formats the `[HH:MM:SS] ` prefix put in front of every log line.
#[must_use]
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("[%H:%M:%S] ").to_string()
}

/// Writes each line to `out` behind a local-time timestamp.
#[derive(Debug)]
pub struct TimestampedLog<W> {
    out: Mutex<W>,
}

impl TimestampedLog<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TimestampedLog<W> {
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for TimestampedLog<W> {
    fn log(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{}{line}", timestamp(&Local::now())).and_then(|()| out.flush())
        {
            warn!(error = %err, "could not write log line");
        }
    }
}

/// Keeps every line in memory, mostly for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LogSink for MemoryLog {
    fn log(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}

/// What a job talks to: a progress snapshot for pollers and a log sink.
#[derive(Clone)]
pub struct Reporter {
    progress: Progress,
    sink: Arc<dyn LogSink>,
}

impl Reporter {
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            progress: Progress::new(),
            sink,
        }
    }

    #[inline]
    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn log(&self, line: &str) {
        info!(target: "tagwright::report", "{line}");
        self.sink.log(line);
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("progress", &self.progress.snapshot())
            .finish_non_exhaustive()
    }
}
