//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::record::Level;
use crate::sampling::SamplingPolicy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LogfanConfig {
    /// Local console output.
    pub console: ConsoleConfig,

    /// Structured output broadcast to subscribers.
    pub structured: StructuredConfig,

    /// Sampling routes and policies.
    pub sampling: SamplingConfig,

    /// Subscriber transport.
    pub server: ServerConfig,

    /// Metrics exporter.
    pub observability: ObservabilityConfig,
}

/// Console sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Minimum level written to the console.
    pub level: Level,

    /// ANSI-colored level names.
    pub color: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            color: true,
        }
    }
}

/// Structured (JSON) sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StructuredConfig {
    /// Minimum level broadcast to subscribers.
    pub level: Level,
}

impl Default for StructuredConfig {
    fn default() -> Self {
        Self { level: Level::Info }
    }
}

/// Parameters of one sampling policy.
///
/// Keys left out of a `[sampling.*]` table keep that policy's built-in value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Window length in milliseconds.
    pub tick_ms: u64,

    /// Records admitted per key at the start of each window.
    pub first: u64,

    /// Admit every n-th record after `first` (0 = none).
    pub thereafter: u64,
}

/// A `[sampling.*]` table as written, before merging onto its base policy.
#[derive(Debug, Default, Deserialize)]
struct PolicyOverrides {
    tick_ms: Option<u64>,
    first: Option<u64>,
    thereafter: Option<u64>,
}

impl PolicyOverrides {
    fn apply(self, base: SamplingPolicy) -> PolicyConfig {
        let base = PolicyConfig::from(base);
        PolicyConfig {
            tick_ms: self.tick_ms.unwrap_or(base.tick_ms),
            first: self.first.unwrap_or(base.first),
            thereafter: self.thereafter.unwrap_or(base.thereafter),
        }
    }
}

fn default_policy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PolicyConfig, D::Error> {
    PolicyOverrides::deserialize(deserializer).map(|o| o.apply(SamplingPolicy::DEFAULT))
}

fn relaxed_policy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PolicyConfig, D::Error> {
    PolicyOverrides::deserialize(deserializer).map(|o| o.apply(SamplingPolicy::RELAXED))
}

impl From<PolicyConfig> for SamplingPolicy {
    fn from(config: PolicyConfig) -> Self {
        SamplingPolicy {
            tick: Duration::from_millis(config.tick_ms),
            first: config.first,
            thereafter: config.thereafter,
        }
    }
}

impl From<SamplingPolicy> for PolicyConfig {
    fn from(policy: SamplingPolicy) -> Self {
        PolicyConfig {
            tick_ms: policy.tick.as_millis() as u64,
            first: policy.first,
            thereafter: policy.thereafter,
        }
    }
}

/// Sampling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Logger name whose records are never sampled.
    pub unsampled_logger: String,

    /// Logger name eligible for the relaxed policy.
    pub relaxed_logger: String,

    /// Messages of `relaxed_logger` that use the relaxed policy.
    pub relaxed_messages: Vec<String>,

    /// Policy for all other records.
    #[serde(deserialize_with = "default_policy")]
    pub default: PolicyConfig,

    /// Policy for relaxed records.
    #[serde(deserialize_with = "relaxed_policy")]
    pub relaxed: PolicyConfig,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            unsampled_logger: "job.status".to_string(),
            relaxed_logger: "job.action".to_string(),
            relaxed_messages: vec!["finished graph".to_string(), "finished thumbnail".to_string()],
            default: SamplingPolicy::DEFAULT.into(),
            relaxed: SamplingPolicy::RELAXED.into(),
        }
    }
}

/// Subscriber transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8990").
    pub bind_address: String,

    /// Messages buffered per subscriber before new ones are dropped.
    pub subscriber_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8990".to_string(),
            subscriber_queue: 256,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
