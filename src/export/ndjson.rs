use std::io::Write;

use anyhow::{Context, Result};
use serde_json::json;

use super::{ExportSink, INDEX_KEY};

/// Writes batches as an Elasticsearch `_bulk` request body
///
/// Every document becomes an `{"index":{"_index":...}}` action line followed by the
/// document itself, with `_index` moved out of the body into the action.
pub struct NdjsonBulkSink<W: Write> {
    writer: W,
    default_index: String,
}

impl<W: Write> NdjsonBulkSink<W> {
    pub fn new(writer: W, default_index: impl Into<String>) -> Self {
        Self { writer, default_index: default_index.into() }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for NdjsonBulkSink<W> {
    fn send_batch(&mut self, docs: &[serde_json::Value]) -> Result<()> {
        for doc in docs {
            let mut body = doc.clone();
            let index = body
                .as_object_mut()
                .and_then(|map| map.remove(INDEX_KEY))
                .unwrap_or_else(|| json!(self.default_index));

            serde_json::to_writer(&mut self.writer, &json!({"index": {"_index": index}}))?;
            self.writer.write_all(b"\n")?;
            serde_json::to_writer(&mut self.writer, &body)?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush().context("Failed to flush bulk output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_body_layout() {
        let mut sink = NdjsonBulkSink::new(Vec::new(), "fallback");
        sink.send_batch(&[json!({"_index": "conn", "uid": "C1"}), json!({"uid": "C2"})]).unwrap();

        let body = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"index":{"_index":"conn"}}"#,
                r#"{"uid":"C1"}"#,
                r#"{"index":{"_index":"fallback"}}"#,
                r#"{"uid":"C2"}"#,
            ]
        );
    }
}
