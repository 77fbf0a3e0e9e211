use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

/// Extension Zeek gives its ASCII logs
pub const LOG_EXTENSION: &str = "log";

/// Path of the converted file written next to `input`
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use zeek_log_parser::utils::output_path;
///
/// assert_eq!(output_path(Path::new("/var/log/zeek/conn.log"), "json"), PathBuf::from("/var/log/zeek/conn.json"));
/// assert_eq!(output_path(Path::new("dns"), "csv"), PathBuf::from("dns.csv"));
/// ```
pub fn output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Expand command-line inputs into log files
///
/// Files are taken as given, whatever their extension. Directories are walked recursively
/// for `*.log` files, sorted by path.
///
/// # Errors
///
/// Returns an error if an input does not exist or a directory cannot be walked.
pub fn collect_log_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory: {}", input.display()))?;
                if entry.file_type().is_file() && has_log_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else {
            bail!("Input not found: {}", input.display());
        }
    }

    Ok(files)
}

fn has_log_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == LOG_EXTENSION)
}
