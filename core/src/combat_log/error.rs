//! Error types for combat log parsing

use std::path::PathBuf;
use thiserror::Error;

/// Errors while decoding a single log line or record.
///
/// All of these are per-line: the line is recorded and skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid line format: expected `MM/D HH:MM:SS.mmm  <content>`: {line}")]
    InvalidLineFormat { line: String },

    #[error("invalid timestamp: {segment}")]
    InvalidTimestamp { segment: String },

    #[error("invalid guid: {value}")]
    InvalidGuid { value: String },

    #[error("invalid {kind} record: {detail}")]
    InvalidRecord { kind: &'static str, detail: String },

    #[error("{matcher}: {detail}")]
    InvalidValue {
        matcher: &'static str,
        detail: String,
    },
}

/// Errors during log file reading operations
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
