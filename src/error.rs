use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the parsing core.
///
/// Only structural problems are errors. Bad data lines and unconvertible values are
/// tolerated and reported through [`crate::parsers::SkipReason`] or by omitting the key.
#[derive(Debug, Error)]
pub enum ZeekLogError {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Failed to open log file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read from log stream: {0}")]
    Read(#[from] io::Error),

    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ZeekLogError>;
