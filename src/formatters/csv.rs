use crate::models::Record;

/// Join column names with commas, no quoting
pub fn header_line<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join(",")
}

/// Render the values present in `record`, each wrapped in double quotes
///
/// Known limitations, kept because downstream consumers rely on the exact shape:
/// - Quotes and commas inside a value are not escaped
/// - A key dropped during coercion has no cell, so later values shift left
pub fn record_line(record: &Record) -> String {
    let mut line = String::new();
    for (_, value) in record.iter() {
        line.push('"');
        line.push_str(&value.to_string());
        line.push_str("\",");
    }
    line.pop();
    line
}
