use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use super::coerce::TypeCoercer;
use super::header::{COMMENT_MARKER, parse_header, trim_line_ending};
use crate::error::{Result, ZeekLogError};
use crate::formatters::{FieldListing, Formatter};
use crate::models::{Header, Metadata, OutputFormat, ReaderOptions, Record};

/// A produced record, rendered according to [`OutputFormat`]
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Record(Record),
    /// A JSON object or CSV row, without a trailing newline
    Text(String),
}

impl Output {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Output::Record(record) => Some(record),
            Output::Text(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Output::Record(record) => Some(record),
            Output::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            Output::Record(_) => None,
        }
    }
}

/// Why a data line produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Embedded `#` line, such as the trailing `#close`
    Comment,
    /// Empty line in a log with more than one column
    BlankLine,
    /// Token count differs from the header, usually a truncated write
    FieldCountMismatch { expected: usize, found: usize },
}

/// Result of one step over the data section
#[derive(Debug, Clone, PartialEq)]
pub enum ReadStep {
    Emit(Output),
    Skip(SkipReason),
}

impl ReadStep {
    pub fn into_output(self) -> Option<Output> {
        match self {
            ReadStep::Emit(output) => Some(output),
            ReadStep::Skip(_) => None,
        }
    }
}

/// Per-reader line counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub records: usize,
    pub comments: usize,
    pub blank_lines: usize,
    pub mismatched: usize,
}

impl ReadStats {
    pub fn skipped(&self) -> usize {
        self.comments + self.blank_lines + self.mismatched
    }
}

/// Forward-only reader over the data lines of one Zeek log
///
/// The header is parsed at construction; a malformed header fails there. Each
/// [`RecordReader::next_step`] then reads one line and yields a record or a skip marker,
/// and `Ok(None)` once input is exhausted. Bad data lines never fail the stream.
///
/// The reader owns its source and drops it as soon as input ends, on [`RecordReader::close`],
/// or when the reader itself is dropped. A second pass needs a new reader.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use zeek_log_parser::models::ReaderOptions;
/// use zeek_log_parser::parsers::RecordReader;
///
/// let log = "#fields\tts\tid.resp_p\n#types\ttime\tport\n1.5\t443\n";
/// let reader = RecordReader::from_reader(Cursor::new(log), ReaderOptions::new())?;
/// let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
/// assert_eq!(records.len(), 1);
/// # Ok::<(), zeek_log_parser::ZeekLogError>(())
/// ```
pub struct RecordReader<R> {
    source: Option<R>,
    header: Header,
    primed: Option<String>,
    coercer: TypeCoercer,
    formatter: Formatter,
    output_format: OutputFormat,
    metadata: Metadata,
    buffer: String,
    line_number: usize,
    stats: ReadStats,
}

impl RecordReader<BufReader<File>> {
    /// Open a log file and parse its header
    pub fn open(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| ZeekLogError::Io { path: path.to_path_buf(), source })?;
        Self::with_source(BufReader::new(file), Some(path), options)
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn from_reader(reader: R, options: ReaderOptions) -> Result<Self> {
        Self::with_source(reader, None, options)
    }

    fn with_source(mut reader: R, path: Option<&Path>, options: ReaderOptions) -> Result<Self> {
        let (header, primed) = parse_header(&mut reader, path)?;
        let coercer = TypeCoercer::new(&header, options.bool_mode);
        let formatter = Formatter::new(&header, &options.filter(), options.safe_headers)?;

        Ok(Self {
            source: Some(reader),
            header,
            primed,
            coercer,
            formatter,
            output_format: options.output_format,
            metadata: options.metadata,
            buffer: String::new(),
            line_number: 0,
            stats: ReadStats::default(),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Active field list: comma-joined in CSV mode, a list otherwise
    pub fn fields(&self) -> FieldListing {
        self.formatter.listing(self.output_format)
    }

    pub fn active_fields(&self) -> Vec<String> {
        self.formatter.active_fields()
    }

    pub fn stats(&self) -> ReadStats {
        self.stats
    }

    /// Whether the source has been released
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Release the source early. Later steps return `Ok(None)`.
    pub fn close(&mut self) {
        self.primed = None;
        self.source = None;
    }

    /// Adapt into an iterator over produced outputs, dropping skip markers
    pub fn records(self) -> Records<R> {
        Records { inner: self }
    }

    /// Advance by one data line
    ///
    /// # Errors
    ///
    /// A read failure (including invalid UTF-8) is returned once; the source is released and
    /// the next call returns `Ok(None)`.
    pub fn next_step(&mut self) -> Result<Option<ReadStep>> {
        let line = match self.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(None),
            Err(e) => {
                self.close();
                return Err(e);
            }
        };
        self.line_number += 1;

        let step = match self.parse_line(&line) {
            Ok(record) => {
                self.stats.records += 1;
                ReadStep::Emit(self.shape(record)?)
            }
            Err(reason) => {
                self.note_skip(reason);
                ReadStep::Skip(reason)
            }
        };
        Ok(Some(step))
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.primed.take() {
            return Ok(Some(line));
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(None);
        };

        self.buffer.clear();
        if source.read_line(&mut self.buffer)? == 0 {
            self.finish();
            return Ok(None);
        }
        Ok(Some(trim_line_ending(&self.buffer).to_string()))
    }

    fn parse_line(&self, line: &str) -> std::result::Result<Record, SkipReason> {
        // An empty line is one empty token, a valid row when the log has a single column
        if line.is_empty() && self.header.len() != 1 {
            return Err(SkipReason::BlankLine);
        }
        if line.trim_start().starts_with(COMMENT_MARKER) {
            return Err(SkipReason::Comment);
        }

        let tokens: Vec<&str> = line.split(self.header.separator()).collect();
        if tokens.len() != self.header.len() {
            return Err(SkipReason::FieldCountMismatch {
                expected: self.header.len(),
                found: tokens.len(),
            });
        }

        let columns = self.formatter.columns();
        let mut record = Record::with_capacity(columns.len());
        for column in columns {
            if let Some(value) = self.coercer.coerce(tokens[column.index], &column.field_type) {
                record.push(column.name.clone(), value);
            }
        }
        Ok(record)
    }

    fn shape(&self, record: Record) -> Result<Output> {
        Ok(match self.output_format {
            OutputFormat::None => Output::Record(record),
            OutputFormat::Csv => Output::Text(self.formatter.csv_line(&record)),
            OutputFormat::Json => Output::Text(self.formatter.json_line(&record, &self.metadata)?),
        })
    }

    fn note_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Comment => self.stats.comments += 1,
            SkipReason::BlankLine => self.stats.blank_lines += 1,
            SkipReason::FieldCountMismatch { expected, found } => {
                self.stats.mismatched += 1;
                warn!(
                    "Skipping data line {} in {}: expected {} fields, found {}",
                    self.line_number,
                    self.source_label(),
                    expected,
                    found
                );
            }
        }
    }

    fn finish(&mut self) {
        self.source = None;
        if self.stats.mismatched > 0 {
            info!(
                "Parsed {}: {} records ({} skipped)",
                self.source_label(),
                self.stats.records,
                self.stats.skipped()
            );
        } else {
            debug!(
                "Parsed {}: {} records ({} skipped)",
                self.source_label(),
                self.stats.records,
                self.stats.skipped()
            );
        }
    }

    fn source_label(&self) -> String {
        self.header
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<stream>".to_string())
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<ReadStep>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_step().transpose()
    }
}

/// Iterator over produced outputs, see [`RecordReader::records`]
pub struct Records<R> {
    inner: RecordReader<R>,
}

impl<R> Records<R> {
    pub fn reader(&self) -> &RecordReader<R> {
        &self.inner
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Output>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next_step() {
                Ok(Some(ReadStep::Emit(output))) => return Some(Ok(output)),
                Ok(Some(ReadStep::Skip(_))) => continue,
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
