//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use logfan::sink::BufferSink;
use logfan::{LogAssembly, LogfanConfig, ManualClock, MessageKind, SendError, Subscriber, SubscriberId};

/// A subscriber that records every payload and can be told to fail.
pub struct RecordingSubscriber {
    id: SubscriberId,
    received: Mutex<Vec<Vec<u8>>>,
    closed: AtomicBool,
}

impl RecordingSubscriber {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: SubscriberId::new(),
            received: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Make every following send fail with `SendError::Closed`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().clone()
    }

    /// Received payloads parsed as JSON documents.
    pub fn documents(&self) -> Vec<serde_json::Value> {
        self.received()
            .iter()
            .map(|p| serde_json::from_slice(p).unwrap())
            .collect()
    }
}

impl Subscriber for RecordingSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn send(&self, _kind: MessageKind, payload: &[u8]) -> Result<(), SendError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SendError::Closed);
        }
        self.received.lock().push(payload.to_vec());
        Ok(())
    }
}

/// A fixed instant to anchor manual clocks.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

/// Assembly with console output captured and time driven by a manual clock.
pub fn manual_assembly() -> (LogAssembly, BufferSink, Arc<ManualClock>) {
    let mut config = LogfanConfig::default();
    config.console.color = false;
    let console = BufferSink::new();
    let clock = Arc::new(ManualClock::new(epoch()));
    let assembly = LogAssembly::with_console(&config, Arc::new(console.clone()))
        .unwrap()
        .map_logger(|logger| logger.with_clock(clock.clone()));
    (assembly, console, clock)
}
