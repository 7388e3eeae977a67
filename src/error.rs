//! Error types shared across the crate.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Failure while encoding or writing a single record.
///
/// Never surfaced to the code that emitted the log call; the logger reports it
/// to its error output and moves on.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure while installing the process-wide logger.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}
