//! Byte sinks that encoded records are written to.
//!
//! # Responsibilities
//! - Define the `Sink` trait shared by the console and the subscriber pool
//! - Serialize concurrent writes to non-thread-safe writers (`LockedWriter`)
//! - Capture output in memory for tests and embedding (`BufferSink`)
//!
//! # Design Decisions
//! - One `write` call carries exactly one encoded record
//! - Sinks are shared as `Arc<dyn Sink>` between derived loggers

pub mod pool;

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

pub use pool::{ConnectionPool, MessageKind, SendError, Subscriber, SubscriberId};

/// A thread-safe destination for encoded records.
pub trait Sink: Send + Sync {
    /// Writes one encoded record, returning the number of bytes accepted.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Flushes buffered output, if any.
    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Wraps any `io::Write` behind a mutex.
pub struct LockedWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> LockedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }
}

impl LockedWriter<io::Stderr> {
    /// The process's standard error stream.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> Sink for LockedWriter<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut writer = self.inner.lock();
        writer.write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// In-memory sink, cloneable so callers can keep a handle to the captured bytes.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for BufferSink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }
}
