//! Shared configuration types for chronicle
//!
//! This crate contains the serializable configuration consumed by the
//! parsing pipeline (chronicle-core) and the command line front end.

use serde::{Deserialize, Serialize};

/// Lines scanned while looking for the recording player before giving up.
pub const DEFAULT_BOOTSTRAP_LOOKAHEAD: usize = 500;

/// Window in which a unit that went inactive in the previous fight cannot
/// restart combat on its own.
pub const DEFAULT_RECENT_INACTIVITY_MS: i64 = 1000;

// ─────────────────────────────────────────────────────────────────────────────
// Serde defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_bootstrap_lookahead() -> usize {
    DEFAULT_BOOTSTRAP_LOOKAHEAD
}

fn default_recent_inactivity_ms() -> i64 {
    DEFAULT_RECENT_INACTIVITY_MS
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory relative log paths are resolved against.
    #[serde(default)]
    pub log_directory: String,

    /// Upper bound on lines buffered while identifying the recording player.
    #[serde(default = "default_bootstrap_lookahead")]
    pub bootstrap_lookahead: usize,

    /// Milliseconds after leaving a fight during which a unit cannot start a new one.
    #[serde(default = "default_recent_inactivity_ms")]
    pub recent_inactivity_ms: i64,

    /// Drop CAST lines that do not carry GUIDs (the formatted log duplicates).
    #[serde(default)]
    pub only_raw_casts: bool,

    /// Rewrite second person phrasing before parsing.
    #[serde(default = "default_true")]
    pub preprocess: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_directory: String::new(),
            bootstrap_lookahead: DEFAULT_BOOTSTRAP_LOOKAHEAD,
            recent_inactivity_ms: DEFAULT_RECENT_INACTIVITY_MS,
            only_raw_casts: false,
            preprocess: true,
        }
    }
}

impl AppConfig {
    pub fn with_log_directory(log_directory: String) -> Self {
        Self {
            log_directory,
            ..Self::default()
        }
    }
}
