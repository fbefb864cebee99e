//! Error types for context operations

use std::path::PathBuf;
use thiserror::Error;

use crate::combat_log::{ParseError, ReaderError};
use crate::merge::MergeError;

/// Errors while driving a parsing session.
///
/// Everything except [`SessionError::Line`] ends the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("recording player not found within {lines_read} lines")]
    BootstrapNotFound { lines_read: usize },

    #[error("second person line seen before the recording player was known")]
    MissingPlayerIdentity,

    #[error("parsing cancelled")]
    Cancelled,

    #[error("failed to read combat log")]
    Read(#[source] MergeError),

    #[error("failed to open combat log")]
    Open(#[from] ReaderError),

    #[error("failed to parse line")]
    Line(#[source] ParseError),
}

impl SessionError {
    /// `false` for per line failures the caller logs and skips.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Line(_))
    }
}

impl From<MergeError> for SessionError {
    fn from(error: MergeError) -> Self {
        match error {
            MergeError::Cancelled => Self::Cancelled,
            other => Self::Read(other),
        }
    }
}

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
