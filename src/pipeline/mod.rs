//! Record pipeline cores.
//!
//! # Data Flow
//! ```text
//! Logger
//!     → RoutingCore (sampling/router.rs)   picks one of three cores per entry
//!         → Sampler (sampling/policy.rs)   per-tick admission counters
//!             → Tee (tee.rs)               every admitted record to every enabled core
//!                 → IoCore (io.rs)         console encoder + stderr
//!                 → IoCore (io.rs)         JSON encoder + ConnectionPool
//! ```
//!
//! # Design Decisions
//! - `admit` and `write` are separate so sampling counts each record exactly once
//! - Derivation (`with`) returns `Arc<dyn Core>`, so a decorator can return itself
//!   and keep its behavior on every derived logger

pub mod io;
pub mod tee;

use std::sync::Arc;

use crate::error::LogError;
use crate::record::{Entry, Field, Level};

pub use io::IoCore;
pub use tee::Tee;

/// A stage of the log pipeline.
pub trait Core: Send + Sync {
    /// Whether any output of this core accepts `level`.
    fn enabled(&self, level: Level) -> bool;

    /// Admission check, run once per record before any field is encoded.
    fn admit(&self, entry: &Entry) -> bool;

    /// Writes an admitted record.
    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), LogError>;

    /// A derived core with `fields` bound to every record it writes.
    fn with(&self, fields: &[Field]) -> Arc<dyn Core>;

    /// Flushes every sink below this core.
    fn sync(&self) -> Result<(), LogError>;
}
