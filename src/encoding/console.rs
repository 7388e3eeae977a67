//! Human-readable, tab-separated console encoding.

use crate::encoding::Encoder;
use crate::error::LogError;
use crate::record::field::FieldMap;
use crate::record::{Entry, Field, Level};

/// Millisecond-precision UTC timestamp layout.
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Console encoder with optional ANSI-colored levels.
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    color: bool,
}

impl ConsoleEncoder {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn push_level(&self, buf: &mut String, level: Level) {
        if !self.color {
            buf.push_str(level.as_capital_str());
            return;
        }
        let code = match level {
            Level::Debug => 35,
            Level::Info => 34,
            Level::Warn => 33,
            Level::Error => 31,
        };
        buf.push_str(&format!("\x1b[{}m{}\x1b[0m", code, level.as_capital_str()));
    }
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>, LogError> {
        let mut line = entry.time.format(TIME_FORMAT).to_string();
        line.push('\t');
        self.push_level(&mut line, entry.level);
        if !entry.logger_name.is_empty() {
            line.push('\t');
            line.push_str(&entry.logger_name);
        }
        line.push('\t');
        line.push_str(&entry.message);
        if !context.is_empty() || !fields.is_empty() {
            line.push('\t');
            line.push_str(&serde_json::to_string(&FieldMap(&[context, fields]))?);
        }
        line.push('\n');
        Ok(line.into_bytes())
    }
}
