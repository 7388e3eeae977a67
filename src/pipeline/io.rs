//! Leaf core: one encoder writing to one sink above a minimum level.

use std::sync::Arc;

use crate::encoding::Encoder;
use crate::error::LogError;
use crate::pipeline::Core;
use crate::record::{Entry, Field, Level};
use crate::sink::Sink;

#[derive(Clone)]
pub struct IoCore {
    min_level: Level,
    encoder: Arc<dyn Encoder>,
    sink: Arc<dyn Sink>,
    context: Arc<[Field]>,
}

impl IoCore {
    pub fn new(encoder: Arc<dyn Encoder>, sink: Arc<dyn Sink>, min_level: Level) -> Self {
        Self {
            min_level,
            encoder,
            sink,
            context: Arc::from(Vec::new()),
        }
    }
}

impl Core for IoCore {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn admit(&self, entry: &Entry) -> bool {
        self.enabled(entry.level)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), LogError> {
        let buf = self.encoder.encode(entry, &self.context, fields)?;
        self.sink.write(&buf)?;
        Ok(())
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        let context: Vec<Field> = self.context.iter().chain(fields).cloned().collect();
        Arc::new(Self {
            context: context.into(),
            ..self.clone()
        })
    }

    fn sync(&self) -> Result<(), LogError> {
        self.sink.sync()?;
        Ok(())
    }
}
