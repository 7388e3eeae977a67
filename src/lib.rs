//! Log fan-out and adaptive sampling.
//!
//! Every admitted record is written to the console and, as one JSON document,
//! to every live subscriber. Sampling depends on the record's logger name:
//! `job.status` is never sampled, `job.action` terminal progress messages are
//! sampled loosely, everything else is rate limited per message.

pub mod assembly;
pub mod config;
pub mod encoding;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod pipeline;
pub mod record;
pub mod sampling;
pub mod sink;

pub use assembly::{add_subscriber, global, init, log, remove_subscriber, LogAssembly};
pub use config::LogfanConfig;
pub use error::{InitError, LogError};
pub use logger::{CheckedEntry, Clock, Logger, ManualClock, SystemClock};
pub use record::{Entry, Field, Level, Value};
pub use sink::{ConnectionPool, MessageKind, SendError, Subscriber, SubscriberId};
