//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Builder for Zeek ASCII log files
pub struct ZeekLogBuilder {
    separator: char,
    set_separator: String,
    path: Option<String>,
    fields: Vec<(String, String)>,
    lines: Vec<String>,
    close: bool,
}

impl ZeekLogBuilder {
    /// Create an empty log with Zeek's default conventions
    pub fn new() -> Self {
        Self {
            separator: '\t',
            set_separator: ",".to_string(),
            path: None,
            fields: Vec::new(),
            lines: Vec::new(),
            close: false,
        }
    }

    /// Set the column separator (written as `#separator \xNN`)
    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn set_separator(mut self, set_separator: &str) -> Self {
        self.set_separator = set_separator.to_string();
        self
    }

    /// Set the `#path` directive
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Declare a column
    pub fn field(mut self, name: &str, field_type: &str) -> Self {
        self.fields.push((name.to_string(), field_type.to_string()));
        self
    }

    /// Add a data row, joined with the separator
    pub fn row(mut self, values: &[&str]) -> Self {
        self.lines.push(values.join(&self.separator.to_string()));
        self
    }

    /// Add a line verbatim
    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Finish with a `#close` line, as Zeek does on rotation
    pub fn with_close(mut self) -> Self {
        self.close = true;
        self
    }

    pub fn build_string(&self) -> String {
        let sep = self.separator.to_string();
        let mut out = String::new();
        out.push_str(&format!("#separator \\x{:02x}\n", self.separator as u32));
        out.push_str(&format!("#set_separator{}{}\n", sep, self.set_separator));
        out.push_str(&format!("#empty_field{}(empty)\n", sep));
        out.push_str(&format!("#unset_field{}-\n", sep));
        if let Some(path) = &self.path {
            out.push_str(&format!("#path{}{}\n", sep, path));
        }
        out.push_str(&format!("#open{}2019-04-23-14-30-05\n", sep));

        let names: Vec<&str> = self.fields.iter().map(|(n, _)| n.as_str()).collect();
        let types: Vec<&str> = self.fields.iter().map(|(_, t)| t.as_str()).collect();
        out.push_str(&format!("#fields{}{}\n", sep, names.join(&sep)));
        out.push_str(&format!("#types{}{}\n", sep, types.join(&sep)));

        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        if self.close {
            out.push_str(&format!("#close{}2019-04-23-15-00-00\n", sep));
        }
        out
    }

    /// Write to a temporary file
    pub fn temp_file(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(self.build_string().as_bytes()).expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    /// Write into `dir` under `name`
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build_string()).expect("Failed to write log file");
        path
    }
}

impl Default for ZeekLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A conn.log with three connections, one with unset numeric fields
pub fn conn_log() -> ZeekLogBuilder {
    ZeekLogBuilder::new()
        .path("conn")
        .field("ts", "time")
        .field("uid", "string")
        .field("id.orig_h", "addr")
        .field("id.orig_p", "port")
        .field("id.resp_h", "addr")
        .field("id.resp_p", "port")
        .field("proto", "enum")
        .field("service", "string")
        .field("duration", "interval")
        .field("orig_bytes", "count")
        .field("local_orig", "bool")
        .field("tunnel_parents", "set[string]")
        .row(&[
            "1500000000.000000",
            "CHhAvVGS1DHFjwGM9",
            "10.0.0.1",
            "52000",
            "93.184.216.34",
            "443",
            "tcp",
            "ssl",
            "1.250000",
            "517",
            "T",
            "(empty)",
        ])
        .row(&[
            "1500000001.500000",
            "ClEkJM2Vm5giqnMf4h",
            "10.0.0.2",
            "53412",
            "8.8.8.8",
            "53",
            "udp",
            "dns",
            "-",
            "-",
            "F",
            "-",
        ])
        .row(&[
            "1500000002.000000",
            "C4J4Th3PJpwUYZZ6gc",
            "10.0.0.3",
            "60001",
            "10.0.0.9",
            "22",
            "tcp",
            "-",
            "12.000000",
            "2048",
            "-",
            "CHhAvVGS1DHFjwGM9,ClEkJM2Vm5giqnMf4h",
        ])
        .with_close()
}
