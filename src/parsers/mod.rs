//! Zeek ASCII log parsing
//!
//! # Error Handling Strategy
//!
//! Header and data lines are treated asymmetrically:
//!
//! - **Header failures are fatal**: a missing or inconsistent `#fields`/`#types` declaration
//!   invalidates the whole file, so [`RecordReader`] construction fails with
//!   [`crate::ZeekLogError::MalformedHeader`].
//!
//! - **Data line failures are tolerated**: embedded comments, blank lines and lines with the
//!   wrong token count become [`SkipReason`] markers and iteration continues.
//!
//! - **Value failures are per-key**: a numeric or bool token that does not convert drops only
//!   that key from the record.
//!
//! - **I/O failures end the stream**: a read error is returned once and the source released.

pub mod coerce;
pub mod header;
pub mod reader;

pub use coerce::TypeCoercer;
pub use header::{decode_separator, parse_header};
pub use reader::{Output, ReadStats, ReadStep, RecordReader, Records, SkipReason};
