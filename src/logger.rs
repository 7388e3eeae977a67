//! Logging call surface.
//!
//! A [`Logger`] is a cheap handle (a few `Arc`s) over a pipeline [`Core`].
//! Named and field-bound children share the parent's sinks and sampling
//! counters.

use std::fmt;
use std::io::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::encoding::console::TIME_FORMAT;
use crate::pipeline::Core;
use crate::record::{Entry, Field, Level};
use crate::sink::{LockedWriter, Sink};

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: std::time::Duration) {
        if let Ok(by) = chrono::Duration::from_std(by) {
            *self.now.lock() += by;
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Named, field-bound logging handle.
#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn Core>,
    name: Arc<str>,
    clock: Arc<dyn Clock>,
    error_output: Arc<dyn Sink>,
}

impl Logger {
    /// Root logger (empty name) over `core`, timestamped by the system clock.
    pub fn new(core: Arc<dyn Core>) -> Self {
        Self {
            core,
            name: Arc::from(""),
            clock: Arc::new(SystemClock),
            error_output: Arc::new(LockedWriter::stderr()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Where encoder and sink failures are reported.
    pub fn with_error_output(mut self, sink: Arc<dyn Sink>) -> Self {
        self.error_output = sink;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child logger named `<parent>.<name>`, or `name` under the root.
    pub fn named(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        let full = if self.name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        };
        Logger {
            name: full.into(),
            ..self.clone()
        }
    }

    /// Child logger with the same name and `fields` attached to every record.
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        Logger {
            core: self.core.with(fields),
            ..self.clone()
        }
    }

    /// Runs the level and sampling checks for a record.
    ///
    /// Returns `None` when the record would be dropped, so callers can skip
    /// building expensive fields.
    pub fn check(&self, level: Level, msg: &str) -> Option<CheckedEntry<'_>> {
        if !self.core.enabled(level) {
            return None;
        }
        let entry = Entry::new(Arc::clone(&self.name), level, msg, self.clock.now());
        if !self.core.admit(&entry) {
            return None;
        }
        Some(CheckedEntry { logger: self, entry })
    }

    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        if let Some(checked) = self.check(level, msg) {
            checked.write(fields);
        }
    }

    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, msg, fields);
    }

    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, msg, fields);
    }

    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Warn, msg, fields);
    }

    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, msg, fields);
    }

    /// Flushes all sinks.
    pub fn sync(&self) -> Result<(), crate::error::LogError> {
        self.core.sync()
    }

    fn report_error(&self, err: &dyn fmt::Display) {
        let line = format!("{} write error: {}\n", self.clock.now().format(TIME_FORMAT), err);
        if self.error_output.write(line.as_bytes()).is_err() {
            let _ = std::io::stderr().write_all(line.as_bytes());
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}

/// A record that passed admission and is ready to be written.
pub struct CheckedEntry<'a> {
    logger: &'a Logger,
    entry: Entry,
}

impl CheckedEntry<'_> {
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Encodes and writes the record. Failures go to the logger's error output.
    pub fn write(self, fields: &[Field]) {
        if let Err(e) = self.logger.core.write(&self.entry, fields) {
            self.logger.report_error(&e);
        }
    }
}
