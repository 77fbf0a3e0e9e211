//! Data models for parsed Zeek logs.
//!
//! - [`Header`] - Schema and sentinel conventions from the leading `#` block
//! - [`FieldType`] - Declared column type, selects a coercion rule
//! - [`Record`] / [`Value`] - One typed data line, fields in header order
//! - [`ReaderOptions`] - Construction-time reader configuration

pub mod header;
pub mod options;
pub mod record;

pub use header::{Coercion, FieldType, Header, safe_field_name};
pub use options::{BoolMode, Metadata, OutputFormat, ReaderOptions};
pub use record::{Record, Value};
