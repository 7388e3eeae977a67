//! Record encoders.
//!
//! # Data Flow
//! ```text
//! admitted (Entry, context fields, call fields)
//!     → console.rs  "2024/05/01 12:00:00.123\tINFO\tjob.status\tstarted\t{...}\n"  → stderr
//!     → json.rs     {"level":"info","ts":...,"logger":...,"msg":...,...}\n      → subscribers
//! ```
//!
//! # Design Decisions
//! - Encoders are stateless; bound context lives in the core that owns them
//! - Each encoder produces one complete, newline-terminated line per record

pub mod console;
pub mod json;

use crate::error::LogError;
use crate::record::{Entry, Field};

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

/// Renders one record into a byte payload.
pub trait Encoder: Send + Sync {
    /// `context` holds fields bound with `Logger::with`, `fields` those passed to the call.
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>, LogError>;
}
