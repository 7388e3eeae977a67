//! Three-tier routing decorator over the sampled and unsampled cores.

use std::sync::Arc;

use crate::config::SamplingConfig;
use crate::error::LogError;
use crate::pipeline::Core;
use crate::record::{Entry, Field, Level};

/// Which policy a record is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Always admitted, never rate limited.
    Unsampled,
    /// Looser rate limit for terminal progress messages.
    Relaxed,
    /// Default rate limit.
    Default,
}

/// Logger names and messages that select the non-default routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRules {
    pub unsampled_logger: String,
    pub relaxed_logger: String,
    pub relaxed_messages: Vec<String>,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            unsampled_logger: "job.status".to_string(),
            relaxed_logger: "job.action".to_string(),
            relaxed_messages: vec!["finished graph".to_string(), "finished thumbnail".to_string()],
        }
    }
}

impl From<&SamplingConfig> for RouteRules {
    fn from(config: &SamplingConfig) -> Self {
        Self {
            unsampled_logger: config.unsampled_logger.clone(),
            relaxed_logger: config.relaxed_logger.clone(),
            relaxed_messages: config.relaxed_messages.clone(),
        }
    }
}

impl RouteRules {
    pub fn route(&self, entry: &Entry) -> Route {
        if *entry.logger_name == *self.unsampled_logger {
            return Route::Unsampled;
        }
        if *entry.logger_name == *self.relaxed_logger
            && self.relaxed_messages.iter().any(|m| *m == entry.message)
        {
            return Route::Relaxed;
        }
        Route::Default
    }
}

/// Decorator that sends each record to the core selected by [`RouteRules`].
///
/// `with` returns another `RoutingCore`, so every derived logger keeps the
/// three-tier behavior.
#[derive(Clone)]
pub struct RoutingCore {
    default: Arc<dyn Core>,
    unsampled: Arc<dyn Core>,
    relaxed: Arc<dyn Core>,
    rules: Arc<RouteRules>,
}

impl RoutingCore {
    pub fn new(
        default: Arc<dyn Core>,
        unsampled: Arc<dyn Core>,
        relaxed: Arc<dyn Core>,
        rules: RouteRules,
    ) -> Self {
        Self {
            default,
            unsampled,
            relaxed,
            rules: Arc::new(rules),
        }
    }

    pub fn route(&self, entry: &Entry) -> Route {
        self.rules.route(entry)
    }

    fn core_for(&self, entry: &Entry) -> &Arc<dyn Core> {
        match self.route(entry) {
            Route::Unsampled => &self.unsampled,
            Route::Relaxed => &self.relaxed,
            Route::Default => &self.default,
        }
    }
}

impl Core for RoutingCore {
    fn enabled(&self, level: Level) -> bool {
        self.unsampled.enabled(level)
    }

    fn admit(&self, entry: &Entry) -> bool {
        self.core_for(entry).admit(entry)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), LogError> {
        self.core_for(entry).write(entry, fields)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(Self {
            default: self.default.with(fields),
            unsampled: self.unsampled.with(fields),
            relaxed: self.relaxed.with(fields),
            rules: Arc::clone(&self.rules),
        })
    }

    fn sync(&self) -> Result<(), LogError> {
        // All three routes end in the same sinks.
        self.unsampled.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::JsonEncoder;
    use crate::pipeline::IoCore;
    use crate::sampling::{Sampler, SamplingPolicy};
    use crate::sink::BufferSink;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn routing(sink: &BufferSink) -> RoutingCore {
        let base: Arc<dyn Core> =
            Arc::new(IoCore::new(Arc::new(JsonEncoder::new()), Arc::new(sink.clone()), Level::Debug));
        RoutingCore::new(
            Arc::new(Sampler::new(base.clone(), SamplingPolicy::DEFAULT, "default")),
            base.clone(),
            Arc::new(Sampler::new(base, SamplingPolicy::RELAXED, "relaxed")),
            RouteRules::default(),
        )
    }

    #[test]
    fn routing_rule_order() {
        let rules = RouteRules::default();
        let route = |name: &str, msg: &str| rules.route(&Entry::new(name, Level::Info, msg, at(0)));

        assert_eq!(route("job.status", "finished graph"), Route::Unsampled);
        assert_eq!(route("job.action", "finished graph"), Route::Relaxed);
        assert_eq!(route("job.action", "finished thumbnail"), Route::Relaxed);
        assert_eq!(route("job.action", "started graph"), Route::Default);
        assert_eq!(route("job.actions", "finished graph"), Route::Default);
        assert_eq!(route("job", "finished graph"), Route::Default);
        assert_eq!(route("", "anything"), Route::Default);
    }

    #[test]
    fn status_records_bypass_sampling() {
        let core = routing(&BufferSink::new());
        for i in 0..100 {
            assert!(core.admit(&Entry::new("job.status", Level::Info, "progress", at(i % 3))));
        }
    }

    #[test]
    fn derived_core_keeps_routing() {
        let sink = BufferSink::new();
        let derived = routing(&sink).with(&[Field::new("job_id", 42)]);

        for _ in 0..5 {
            let entry = Entry::new("job.status", Level::Info, "state", at(0));
            assert!(derived.admit(&entry));
            derived.write(&entry, &[]).unwrap();
        }
        assert!(derived.admit(&Entry::new("other", Level::Info, "noise", at(0))));
        assert!(!derived.admit(&Entry::new("other", Level::Info, "noise", at(1))));

        let lines = sink.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.contains("\"job_id\":42")));
    }
}
