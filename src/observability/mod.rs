//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Crate internals and host code using `tracing`:
//!     → layer.rs (tracing events → Logger records)
//!     → logging.rs (installs the tracing subscriber)
//!
//! Sampler / ConnectionPool:
//!     → metrics.rs (counters, gauges)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - `tracing` call sites route into the same sampled fan-out as direct Logger calls
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod layer;
pub mod logging;
pub mod metrics;

pub use layer::LogfanLayer;
