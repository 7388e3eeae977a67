//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP server stops accepting
//!             → open subscriber sessions send Close and unsubscribe
//! ```
//!
//! # Design Decisions
//! - The logger itself has no teardown; only transport sessions are drained
//! - Sessions unsubscribe on exit, so the pool is empty after shutdown
//! - The stop signal is latched, so a session upgraded after the trigger still ends

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
