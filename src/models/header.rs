use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEPARATOR: char = '\t';
pub const DEFAULT_SET_SEPARATOR: &str = ",";
pub const DEFAULT_EMPTY_FIELD: &str = "(empty)";
pub const DEFAULT_UNSET_FIELD: &str = "-";

/// Format Zeek uses for the `#open` and `#close` directives
const OPEN_TIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Declared type of a log column
///
/// Only selects a coercion rule. Composite tags such as `set[string]` collapse to
/// [`FieldType::Set`] / [`FieldType::Vector`], and tags Zeek may add later land in
/// [`FieldType::Other`] and coerce like strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Time,
    Interval,
    String,
    Bool,
    Count,
    Int,
    Double,
    Addr,
    Port,
    Subnet,
    Enum,
    Set,
    Vector,
    Record,
    Pattern,
    Other(String),
}

/// How a raw token of a given [`FieldType`] is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Unsigned,
    Float,
    Boolean,
}

impl FieldType {
    pub fn coercion(&self) -> Coercion {
        match self {
            FieldType::Port | FieldType::Count => Coercion::Unsigned,
            FieldType::Double | FieldType::Interval | FieldType::Time => Coercion::Float,
            FieldType::Bool => Coercion::Boolean,
            FieldType::String
            | FieldType::Int
            | FieldType::Addr
            | FieldType::Subnet
            | FieldType::Enum
            | FieldType::Set
            | FieldType::Vector
            | FieldType::Record
            | FieldType::Pattern
            | FieldType::Other(_) => Coercion::Text,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Time => "time",
            FieldType::Interval => "interval",
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Count => "count",
            FieldType::Int => "int",
            FieldType::Double => "double",
            FieldType::Addr => "addr",
            FieldType::Port => "port",
            FieldType::Subnet => "subnet",
            FieldType::Enum => "enum",
            FieldType::Set => "set",
            FieldType::Vector => "vector",
            FieldType::Record => "record",
            FieldType::Pattern => "pattern",
            FieldType::Other(tag) => tag,
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        // set[string] / vector[count] etc.
        let base = tag.split_once('[').map_or(tag, |(base, _)| base);
        match base {
            "time" => FieldType::Time,
            "interval" => FieldType::Interval,
            "string" => FieldType::String,
            "bool" => FieldType::Bool,
            "count" => FieldType::Count,
            "int" => FieldType::Int,
            "double" => FieldType::Double,
            "addr" => FieldType::Addr,
            "port" => FieldType::Port,
            "subnet" => FieldType::Subnet,
            "enum" => FieldType::Enum,
            "set" => FieldType::Set,
            "vector" => FieldType::Vector,
            "record" => FieldType::Record,
            "pattern" => FieldType::Pattern,
            _ => FieldType::Other(tag.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema and conventions declared by a log file's leading `#` block
///
/// Built once by [`crate::parsers::parse_header`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub(crate) separator: char,
    pub(crate) set_separator: String,
    pub(crate) empty_field: String,
    pub(crate) unset_field: String,
    pub(crate) path: Option<String>,
    pub(crate) open_time: Option<String>,
    pub(crate) fields: Vec<String>,
    pub(crate) types: Vec<FieldType>,
    pub(crate) source: Option<PathBuf>,
    pub(crate) extra: Vec<(String, Vec<String>)>,
}

impl Header {
    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn set_separator(&self) -> &str {
        &self.set_separator
    }

    pub fn empty_field(&self) -> &str {
        &self.empty_field
    }

    pub fn unset_field(&self) -> &str {
        &self.unset_field
    }

    /// Value of the `#path` directive
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Kind of log (`conn`, `dns`, `http`, ...), as declared by `#path`
    pub fn log_kind(&self) -> Option<&str> {
        self.path()
    }

    /// Raw value of the `#open` directive
    pub fn open_time(&self) -> Option<&str> {
        self.open_time.as_deref()
    }

    /// `#open` parsed as a timestamp, if it uses Zeek's `YYYY-MM-DD-HH-MM-SS` form
    pub fn open_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.open_time.as_deref()?;
        NaiveDateTime::parse_from_str(raw, OPEN_TIME_FORMAT).ok()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn types(&self) -> &[FieldType] {
        &self.types
    }

    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().position(|f| f == name).map(|i| &self.types[i])
    }

    /// File the header was read from, when opened from a path
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directives that carry no meaning for parsing, kept in declaration order
    pub fn extra(&self) -> &[(String, Vec<String>)] {
        &self.extra
    }

    pub fn extra_value(&self, key: &str) -> Option<&[String]> {
        self.extra.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_slice())
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Rewrites every occurrence of the set separator in a field name to `_`
///
/// ```
/// use zeek_log_parser::models::safe_field_name;
///
/// assert_eq!(safe_field_name("service,proto", ","), "service_proto");
/// assert_eq!(safe_field_name("id.orig_h", ","), "id.orig_h");
/// ```
pub fn safe_field_name(name: &str, set_separator: &str) -> String {
    if set_separator.is_empty() {
        return name.to_string();
    }
    name.replace(set_separator, "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_from_tag() {
        assert_eq!(FieldType::from("time"), FieldType::Time);
        assert_eq!(FieldType::from("port"), FieldType::Port);
        assert_eq!(FieldType::from("set[string]"), FieldType::Set);
        assert_eq!(FieldType::from("vector[interval]"), FieldType::Vector);
        assert_eq!(FieldType::from("table[string]"), FieldType::Other("table[string]".to_string()));
    }

    #[test]
    fn test_field_type_coercion_table() {
        assert_eq!(FieldType::Count.coercion(), Coercion::Unsigned);
        assert_eq!(FieldType::Port.coercion(), Coercion::Unsigned);
        assert_eq!(FieldType::Interval.coercion(), Coercion::Float);
        assert_eq!(FieldType::Time.coercion(), Coercion::Float);
        assert_eq!(FieldType::Bool.coercion(), Coercion::Boolean);
        assert_eq!(FieldType::Int.coercion(), Coercion::Text);
        assert_eq!(FieldType::Set.coercion(), Coercion::Text);
        assert_eq!(FieldType::Other("func".to_string()).coercion(), Coercion::Text);
    }

    #[test]
    fn test_field_type_display_keeps_unknown_tag() {
        assert_eq!(FieldType::Addr.to_string(), "addr");
        assert_eq!(FieldType::Other("table[addr]".to_string()).to_string(), "table[addr]");
    }

    #[test]
    fn test_safe_field_name_with_empty_separator() {
        assert_eq!(safe_field_name("a,b", ""), "a,b");
    }
}
