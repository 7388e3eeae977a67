//! Fan-out core: writes each record to every child core enabled for its level.

use std::sync::Arc;

use crate::error::LogError;
use crate::pipeline::Core;
use crate::record::{Entry, Field, Level};

#[derive(Clone)]
pub struct Tee {
    cores: Vec<Arc<dyn Core>>,
}

impl Tee {
    pub fn new(cores: Vec<Arc<dyn Core>>) -> Self {
        Self { cores }
    }
}

impl Core for Tee {
    fn enabled(&self, level: Level) -> bool {
        self.cores.iter().any(|c| c.enabled(level))
    }

    fn admit(&self, entry: &Entry) -> bool {
        self.enabled(entry.level)
    }

    /// Every enabled child is written even when an earlier one fails; the
    /// first error is returned.
    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), LogError> {
        let mut first_err = None;
        for core in self.cores.iter().filter(|c| c.enabled(entry.level)) {
            if let Err(e) = core.write(entry, fields) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(Self {
            cores: self.cores.iter().map(|c| c.with(fields)).collect(),
        })
    }

    fn sync(&self) -> Result<(), LogError> {
        let mut first_err = None;
        for core in &self.cores {
            if let Err(e) = core.sync() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
