use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{Metadata, Record};

/// A record with constant metadata merged in
///
/// A metadata key that collides with a field replaces the field's value at the field's
/// position; the remaining metadata keys follow the fields.
pub struct JsonLine<'a> {
    pub record: &'a Record,
    pub metadata: &'a Metadata,
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.record.iter() {
            match self.metadata.get(key) {
                Some(meta) => map.serialize_entry(key, meta)?,
                None => map.serialize_entry(key, value)?,
            }
        }
        for (key, value) in self.metadata.iter() {
            if !self.record.contains_key(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

pub fn record_line(record: &Record, metadata: &Metadata) -> serde_json::Result<String> {
    serde_json::to_string(&JsonLine { record, metadata })
}
