//! `tracing` → `Logger` bridge.

use std::fmt;

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::logger::Logger;
use crate::record::{Field, Level};

/// Forwards `tracing` events to a [`Logger`].
///
/// The event target becomes the logger name (`::` → `.`), so
/// `tracing::info!(target: "job.status", ...)` is never sampled.
#[derive(Debug, Clone)]
pub struct LogfanLayer {
    logger: Logger,
}

impl LogfanLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

fn level_of(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        _ => Level::Debug,
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.fields.push(Field::new(field.name(), value));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(Field::new(field.name(), format!("{:?}", value)));
        }
    }
}

impl<S: Subscriber> Layer<S> for LogfanLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = level_of(metadata.level());
        let logger = self.logger.named(&metadata.target().replace("::", "."));

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        if let Some(checked) = logger.check(level, &visitor.message) {
            checked.write(&visitor.fields);
        }
    }
}
