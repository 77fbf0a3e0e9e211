//! Zeek Log Parser - Typed, filterable records from Zeek (Bro) ASCII logs
//!
//! This library reads the self-describing, tab-separated log format written by the Zeek
//! network security monitor. It supports:
//!
//! - Parsing the `#` header block (separator, sentinels, `#fields`, `#types`)
//! - Streaming data lines as typed [`Record`]s with per-type coercion
//! - Field filtering and safe field-name rewriting
//! - Rendering records as JSON lines or CSV
//! - Batching records into an Elasticsearch `_bulk` body
//!
//! # Example
//!
//! ```no_run
//! use zeek_log_parser::{OutputFormat, ReaderOptions, RecordReader};
//!
//! let options = ReaderOptions::new().output_format(OutputFormat::Json).fields(["ts", "id.orig_h"]);
//! for line in RecordReader::open("conn.log", options)?.records() {
//!     println!("{}", line?.as_text().unwrap_or_default());
//! }
//! # Ok::<(), zeek_log_parser::ZeekLogError>(())
//! ```

pub mod cli;
pub mod error;
pub mod export;
pub mod filters;
pub mod formatters;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use error::ZeekLogError;
pub use formatters::{FieldListing, Formatter};
pub use models::{BoolMode, FieldType, Header, OutputFormat, ReaderOptions, Record, Value};
pub use parsers::{Output, ReadStep, RecordReader, SkipReason, parse_header};
