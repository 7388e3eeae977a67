//! Structured logging initialization.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Route `tracing` events into the process-wide sampled fan-out
//!
//! # Design Decisions
//! - Filter configurable via `RUST_LOG`, defaulting to `info` plus `logfan=debug`
//! - No separate fmt layer: the console sink already prints every admitted record

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::logger::Logger;
use crate::observability::LogfanLayer;

const DEFAULT_FILTER: &str = "info,logfan=debug";

/// Install a global `tracing` subscriber that forwards to `logger`.
pub fn init_tracing(logger: Logger) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(LogfanLayer::new(logger))
        .try_init()
}
