//! Structured JSON encoding, one document per line.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::encoding::Encoder;
use crate::error::LogError;
use crate::record::{Entry, Field};

/// Field-preserving JSON encoder for remote subscribers.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

struct Document<'a> {
    entry: &'a Entry,
    context: &'a [Field],
    fields: &'a [Field],
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", self.entry.level.as_str())?;
        let ts = self.entry.time.timestamp() as f64
            + f64::from(self.entry.time.timestamp_subsec_nanos()) / 1e9;
        map.serialize_entry("ts", &ts)?;
        if !self.entry.logger_name.is_empty() {
            map.serialize_entry("logger", &*self.entry.logger_name)?;
        }
        map.serialize_entry("msg", &self.entry.message)?;
        for field in self.context.iter().chain(self.fields) {
            map.serialize_entry(field.key(), field.value())?;
        }
        map.end()
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, context: &[Field], fields: &[Field]) -> Result<Vec<u8>, LogError> {
        let mut buf = serde_json::to_vec(&Document { entry, context, fields })?;
        buf.push(b'\n');
        Ok(buf)
    }
}
