//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ticks > 0, queue sizes > 0)
//! - Check addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogfanConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{LogfanConfig, PolicyConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sampling.{policy}.tick_ms must be greater than 0")]
    ZeroTick { policy: &'static str },

    #[error("sampling.{policy}.first must be greater than 0")]
    ZeroFirst { policy: &'static str },

    #[error("sampling.{field} must not be empty")]
    EmptyLoggerName { field: &'static str },

    #[error("server.subscriber_queue must be greater than 0")]
    ZeroSubscriberQueue,

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &LogfanConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_policy("default", &config.sampling.default, &mut errors);
    validate_policy("relaxed", &config.sampling.relaxed, &mut errors);

    if config.sampling.unsampled_logger.is_empty() {
        errors.push(ValidationError::EmptyLoggerName { field: "unsampled_logger" });
    }
    if config.sampling.relaxed_logger.is_empty() {
        errors.push(ValidationError::EmptyLoggerName { field: "relaxed_logger" });
    }

    if config.server.subscriber_queue == 0 {
        errors.push(ValidationError::ZeroSubscriberQueue);
    }
    validate_address("server.bind_address", &config.server.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        validate_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_policy(name: &'static str, policy: &PolicyConfig, errors: &mut Vec<ValidationError>) {
    if policy.tick_ms == 0 {
        errors.push(ValidationError::ZeroTick { policy: name });
    }
    if policy.first == 0 {
        errors.push(ValidationError::ZeroFirst { policy: name });
    }
}

fn validate_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
