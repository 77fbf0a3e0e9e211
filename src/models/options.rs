use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::filters::FieldFilter;

/// Rendering applied by [`crate::parsers::RecordReader`] to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Hand back the [`crate::models::Record`] itself
    #[default]
    None,
    Csv,
    Json,
}

/// Interpretation of `bool` columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolMode {
    /// Any non-empty token is `true`, including `F`
    #[default]
    Truthy,
    /// `T`/`true` and `F`/`false` only; anything else drops the key
    Strict,
}

/// Constant key/value pairs merged into every JSON record, in insertion order
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct Metadata {
    entries: Vec<(String, serde_json::Value)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for Metadata {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        Self { entries: map.into_iter().collect() }
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Construction-time configuration of a [`crate::parsers::RecordReader`]
///
/// # Examples
///
/// ```
/// use zeek_log_parser::models::{OutputFormat, ReaderOptions};
///
/// let options = ReaderOptions::new()
///     .fields(["ts", "id.orig_h"])
///     .output_format(OutputFormat::Json)
///     .metadata("sensor", "edge-1");
/// assert_eq!(options.output_format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Restrict output to these (effective) field names; `None` keeps all
    pub fields: Option<Vec<String>>,
    /// Field names that are always excluded
    pub ignore_keys: Vec<String>,
    pub output_format: OutputFormat,
    /// Rewrite the set separator in field names to `_`
    pub safe_headers: bool,
    pub metadata: Metadata,
    pub bool_mode: BoolMode,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn ignore_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn safe_headers(mut self, enabled: bool) -> Self {
        self.safe_headers = enabled;
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn bool_mode(mut self, mode: BoolMode) -> Self {
        self.bool_mode = mode;
        self
    }

    pub fn filter(&self) -> FieldFilter {
        FieldFilter::new(self.fields.clone(), self.ignore_keys.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_from_json() {
        let json = r#"{
            "fields": ["ts", "uid"],
            "output_format": "csv",
            "safe_headers": true,
            "metadata": {"sensor": "edge-1"}
        }"#;

        let options: ReaderOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.fields, Some(vec!["ts".to_string(), "uid".to_string()]));
        assert_eq!(options.output_format, OutputFormat::Csv);
        assert!(options.safe_headers);
        assert!(options.ignore_keys.is_empty());
        assert_eq!(options.bool_mode, BoolMode::Truthy);
        assert_eq!(options.metadata.get("sensor"), Some(&serde_json::json!("edge-1")));
    }

    #[test]
    fn test_metadata_insert_replaces_in_place() {
        let mut metadata = Metadata::new();
        metadata.insert("a", 1);
        metadata.insert("b", 2);
        metadata.insert("a", 3);

        let keys: Vec<_> = metadata.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(metadata.get("a"), Some(&serde_json::json!(3)));
    }
}
