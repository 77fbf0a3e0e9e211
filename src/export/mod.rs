//! Bulk export of parsed records to a document store
//!
//! The exporter only shapes and batches documents; delivery is delegated to an
//! [`ExportSink`]. Failed batches are logged and counted but do not stop the export.

pub mod ndjson;

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::models::OutputFormat;
use crate::parsers::{Output, RecordReader};

pub use ndjson::NdjsonBulkSink;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const INDEX_KEY: &str = "_index";

/// Destination for batches of JSON documents
pub trait ExportSink {
    fn send_batch(&mut self, docs: &[serde_json::Value]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub documents: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub failed_documents: usize,
}

#[derive(Debug, Clone)]
pub struct BulkExporter {
    index: String,
    batch_size: usize,
}

impl BulkExporter {
    pub fn new(index: impl Into<String>) -> Self {
        Self { index: index.into(), batch_size: DEFAULT_BATCH_SIZE }
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Drain `reader` into `sink` in batches
    ///
    /// Each document gets the target index under `_index`, and an ISO-8601 `timestamp`
    /// derived from a numeric `ts` field when there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is in CSV mode or the log stream fails to read.
    /// Sink failures are not errors; they show up in [`ExportSummary::failed_batches`].
    pub fn export<R, S>(&self, reader: RecordReader<R>, sink: &mut S) -> Result<ExportSummary>
    where
        R: BufRead,
        S: ExportSink + ?Sized,
    {
        if reader.output_format() == OutputFormat::Csv {
            bail!("Bulk export needs JSON or record output, but the reader renders CSV");
        }

        let mut summary = ExportSummary::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for output in reader.records() {
            let output = output.context("Failed to read log record")?;
            batch.push(self.to_document(output)?);

            if batch.len() >= self.batch_size {
                self.flush(sink, &mut batch, &mut summary);
            }
        }
        if !batch.is_empty() {
            self.flush(sink, &mut batch, &mut summary);
        }

        info!(
            "Exported {} documents to index {} ({} batches, {} failed)",
            summary.documents - summary.failed_documents,
            self.index,
            summary.batches,
            summary.failed_batches
        );
        Ok(summary)
    }

    fn to_document(&self, output: Output) -> Result<serde_json::Value> {
        let mut doc = match output {
            Output::Text(line) => {
                serde_json::from_str(&line).context("Reader produced invalid JSON")?
            }
            Output::Record(record) => serde_json::to_value(&record)?,
        };

        if let serde_json::Value::Object(map) = &mut doc {
            map.insert(INDEX_KEY.to_string(), serde_json::Value::String(self.index.clone()));
            if let Some(timestamp) =
                map.get("ts").and_then(serde_json::Value::as_f64).and_then(iso_timestamp)
            {
                map.insert("timestamp".to_string(), serde_json::Value::String(timestamp));
            }
        }
        Ok(doc)
    }

    fn flush<S: ExportSink + ?Sized>(
        &self,
        sink: &mut S,
        batch: &mut Vec<serde_json::Value>,
        summary: &mut ExportSummary,
    ) {
        summary.batches += 1;
        summary.documents += batch.len();
        if let Err(e) = sink.send_batch(batch) {
            warn!("Failed to send batch of {} documents: {:#}", batch.len(), e);
            summary.failed_batches += 1;
            summary.failed_documents += batch.len();
        }
        batch.clear();
    }
}

/// Render epoch seconds as a UTC timestamp without offset, e.g. `2017-07-14T02:40:00`
pub fn iso_timestamp(ts: f64) -> Option<String> {
    if !ts.is_finite() {
        return None;
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9).round().min(999_999_999.0) as u32;
    let datetime = DateTime::<Utc>::from_timestamp(secs as i64, nanos)?;
    Some(datetime.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}
