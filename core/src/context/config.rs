//! Application configuration
//!
//! This module re-exports the shared [`AppConfig`] from chronicle-types and
//! provides the platform specific log directory plus persistence.

use std::path::{Path, PathBuf};

pub use chronicle_types::AppConfig;

use super::error::ConfigError;

const APP_NAME: &str = "chronicle";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_log_directory() -> String {
    #[cfg(target_os = "windows")]
    {
        dirs::document_dir()
            .map(|p| p.join("World of Warcraft/Logs"))
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_default()
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs::home_dir()
            .map(|p| p.join("Games/world-of-warcraft/drive_c/Program Files/World of Warcraft/Logs"))
            .and_then(|p| p.to_str().map(String::from))
            .unwrap_or_default()
    }
    #[cfg(target_os = "macos")]
    {
        String::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn load_with_defaults() -> Self;
    fn load_from_path(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    /// Resolve a log file path, joining with `log_directory` if relative.
    fn resolve_log_path(&self, path: &Path) -> PathBuf;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(%error, "Falling back to default configuration");
                Self::load_with_defaults()
            }
        }
    }

    /// Load with platform-specific defaults (used when no config file exists)
    fn load_with_defaults() -> Self {
        AppConfig::with_log_directory(default_log_directory())
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn resolve_log_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.log_directory.is_empty() {
            path.to_path_buf()
        } else {
            Path::new(&self.log_directory).join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_path_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_directory = \"/logs\"\nonly_raw_casts = true").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.log_directory, "/logs");
        assert!(config.only_raw_casts);
        assert_eq!(config.bootstrap_lookahead, 500);
        assert!(config.preprocess);
    }

    #[test]
    fn test_load_from_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            AppConfig::load_from_path(&missing),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "bootstrap_lookahead = \"many\"").unwrap();
        assert!(matches!(AppConfig::load_from_path(&bad), Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn test_resolve_log_path() {
        let config = AppConfig::with_log_directory("/wow/Logs".to_string());
        assert_eq!(
            config.resolve_log_path(Path::new("WoWCombatLog.txt")),
            PathBuf::from("/wow/Logs/WoWCombatLog.txt")
        );
        assert_eq!(config.resolve_log_path(Path::new("/tmp/a.txt")), PathBuf::from("/tmp/a.txt"));

        let bare = AppConfig::default();
        assert_eq!(bare.resolve_log_path(Path::new("a.txt")), PathBuf::from("a.txt"));
    }
}
