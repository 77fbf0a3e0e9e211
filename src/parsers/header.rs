use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Result, ZeekLogError};
use crate::models::{FieldType, Header};
use crate::models::header::{
    DEFAULT_EMPTY_FIELD, DEFAULT_SEPARATOR, DEFAULT_SET_SEPARATOR, DEFAULT_UNSET_FIELD,
};

pub const COMMENT_MARKER: char = '#';

/// Read the leading `#` block of a log stream
///
/// Consumes every comment line up to the first data line. That data line is read
/// (there is no peeking on a `BufRead`), so it is handed back to the caller and must be
/// treated as the first record. It is `None` when the stream ends inside the header.
///
/// `#separator` is always split on whitespace and may appear first so later lines are
/// split with the separator it declares.
///
/// # Errors
///
/// Returns [`ZeekLogError::MalformedHeader`] if:
/// - `#fields` or `#types` is missing
/// - `#fields` and `#types` have different lengths
/// - A field name is declared twice
/// - The `#separator` value does not decode to a single character
///
/// Returns [`ZeekLogError::Read`] if the stream cannot be read or is not UTF-8.
pub fn parse_header<R: BufRead>(
    reader: &mut R,
    source: Option<&Path>,
) -> Result<(Header, Option<String>)> {
    let mut draft = HeaderDraft::default();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok((draft.finish(source)?, None));
        }

        let content = trim_line_ending(&line);
        if !content.trim_start().starts_with(COMMENT_MARKER) {
            let header = draft.finish(source)?;
            return Ok((header, Some(content.to_string())));
        }

        draft.apply(content)?;
    }
}

/// Strip a trailing `\n` or `\r\n`
pub(crate) fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Decode a `#separator` value such as `\x09`, `\t` or a literal character
pub fn decode_separator(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let first = chars.next()?;
    if first != '\\' {
        return chars.next().is_none().then_some(first);
    }

    match chars.next()? {
        'x' => {
            let hex = chars.as_str();
            if hex.len() != 2 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            u8::from_str_radix(hex, 16).ok().map(char::from)
        }
        escaped => {
            if chars.next().is_some() {
                return None;
            }
            match escaped {
                't' => Some('\t'),
                'n' => Some('\n'),
                'r' => Some('\r'),
                '\\' => Some('\\'),
                _ => None,
            }
        }
    }
}

struct HeaderDraft {
    separator: char,
    set_separator: String,
    empty_field: String,
    unset_field: String,
    path: Option<String>,
    open_time: Option<String>,
    fields: Option<Vec<String>>,
    types: Option<Vec<FieldType>>,
    extra: Vec<(String, Vec<String>)>,
}

impl Default for HeaderDraft {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            set_separator: DEFAULT_SET_SEPARATOR.to_string(),
            empty_field: DEFAULT_EMPTY_FIELD.to_string(),
            unset_field: DEFAULT_UNSET_FIELD.to_string(),
            path: None,
            open_time: None,
            fields: None,
            types: None,
            extra: Vec::new(),
        }
    }
}

impl HeaderDraft {
    fn apply(&mut self, line: &str) -> Result<()> {
        let line = line.trim_start();
        let body = line.strip_prefix(COMMENT_MARKER).unwrap_or(line);

        let mut words = body.split_whitespace();
        if words.next() == Some("separator") {
            let value = words.next().ok_or_else(|| {
                ZeekLogError::MalformedHeader("#separator has no value".to_string())
            })?;
            self.separator = decode_separator(value).ok_or_else(|| {
                ZeekLogError::MalformedHeader(format!("Invalid #separator value: {}", value))
            })?;
            trace!(separator = ?self.separator, "Header separator");
            return Ok(());
        }

        let mut tokens = body.split(self.separator);
        let key = tokens.next().unwrap_or_default();
        let values: Vec<String> = tokens.map(str::to_string).collect();
        trace!(key, ?values, "Header directive");

        match key {
            "fields" => self.fields = Some(values),
            "types" => self.types = Some(values.iter().map(|t| FieldType::from(t.as_str())).collect()),
            "set_separator" => {
                if let Some(value) = values.into_iter().next() {
                    self.set_separator = value;
                }
            }
            "empty_field" => {
                if let Some(value) = values.into_iter().next() {
                    self.empty_field = value;
                }
            }
            "unset_field" => {
                if let Some(value) = values.into_iter().next() {
                    self.unset_field = value;
                }
            }
            "path" => self.path = values.into_iter().next(),
            "open" => self.open_time = values.into_iter().next(),
            _ => self.extra.push((key.to_string(), values)),
        }

        Ok(())
    }

    fn finish(self, source: Option<&Path>) -> Result<Header> {
        let fields = self
            .fields
            .ok_or_else(|| ZeekLogError::MalformedHeader("missing #fields line".to_string()))?;
        let types = self
            .types
            .ok_or_else(|| ZeekLogError::MalformedHeader("missing #types line".to_string()))?;

        if fields.len() != types.len() {
            return Err(ZeekLogError::MalformedHeader(format!(
                "#fields declares {} columns but #types declares {}",
                fields.len(),
                types.len()
            )));
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for name in &fields {
            if !seen.insert(name.as_str()) {
                return Err(ZeekLogError::MalformedHeader(format!(
                    "field '{}' is declared more than once",
                    name
                )));
            }
        }

        debug!(
            path = self.path.as_deref().unwrap_or("-"),
            columns = fields.len(),
            "Parsed log header"
        );

        Ok(Header {
            separator: self.separator,
            set_separator: self.set_separator,
            empty_field: self.empty_field,
            unset_field: self.unset_field,
            path: self.path,
            open_time: self.open_time,
            fields,
            types,
            source: source.map(Path::to_path_buf),
            extra: self.extra,
        })
    }
}
