//! Rendering of records and field lists as CSV or JSON text.
//!
//! [`Formatter`] owns the active column plan (filter and safe-header renaming already
//! applied), so the header echo, CSV columns and JSON keys always agree. Formatting is
//! pure: the same record renders to byte-identical output every time.

pub mod csv;
pub mod json;

use std::fmt;

use crate::error::Result;
use crate::filters::{Column, FieldFilter, select_columns};
use crate::models::{Header, Metadata, OutputFormat, Record};

/// Active field list, shaped for the output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldListing {
    /// Comma-joined, for a CSV header row
    Joined(String),
    List(Vec<String>),
}

impl fmt::Display for FieldListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldListing::Joined(line) => f.write_str(line),
            FieldListing::List(names) => f.write_str(&names.join("\n")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Formatter {
    columns: Vec<Column>,
}

impl Formatter {
    /// # Errors
    ///
    /// Fails when safe renaming makes two selected field names collide.
    pub fn new(header: &Header, filter: &FieldFilter, safe_headers: bool) -> Result<Self> {
        Ok(Self { columns: select_columns(header, filter, safe_headers)? })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn active_fields(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn fields_csv(&self) -> String {
        csv::header_line(self.columns.iter().map(|c| c.name.as_str()))
    }

    pub fn listing(&self, format: OutputFormat) -> FieldListing {
        match format {
            OutputFormat::Csv => FieldListing::Joined(self.fields_csv()),
            OutputFormat::Json | OutputFormat::None => FieldListing::List(self.active_fields()),
        }
    }

    /// See [`csv::record_line`] for the quoting limitations
    pub fn csv_line(&self, record: &Record) -> String {
        csv::record_line(record)
    }

    pub fn json_line(&self, record: &Record, metadata: &Metadata) -> Result<String> {
        Ok(json::record_line(record, metadata)?)
    }
}
