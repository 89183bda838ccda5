//! Persisted settings for tree building

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::paths::expand_tilde;

/// Defaults applied when a caller does not pass flags explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultFlags {
    #[serde(default)]
    pub with_ui_data: bool,
    #[serde(default)]
    pub redact_external_paths: bool,
}

/// Settings saved to `<config dir>/restree/config.json`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root that disk paths must lie under when redacting; `~` is expanded
    #[serde(default)]
    pub mod_directory: Option<PathBuf>,
    #[serde(default)]
    pub default_flags: DefaultFlags,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("restree").join("config.json"))
    }

    /// Load config from the default location, or return defaults
    ///
    /// A missing or unreadable file is not an error here.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the default location
    ///
    /// # Errors
    /// Returns an error if there is no config directory or writing fails.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(Error::ConfigDirNotFound)?;
        self.save_to(path)
    }

    /// Save config to a specific file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if the directories or the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// The mod directory with `~` expanded
    pub fn mod_directory(&self) -> Option<PathBuf> {
        self.mod_directory.as_deref().map(expand_tilde)
    }

    /// The mod directory, checked to be an existing directory
    ///
    /// # Errors
    /// Returns [`Error::ModDirectoryInvalid`] if it is set but not a directory.
    pub fn validated_mod_directory(&self) -> Result<Option<PathBuf>> {
        match self.mod_directory() {
            Some(path) if !path.is_dir() => Err(Error::ModDirectoryInvalid { path }),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            mod_directory: Some(dir.path().join("mods")),
            default_flags: DefaultFlags {
                with_ui_data: true,
                redact_external_paths: false,
            },
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"mod_directory": "/srv/mods"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mod_directory, Some(PathBuf::from("/srv/mods")));
        assert_eq!(config.default_flags, DefaultFlags::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::JsonError(_))));
    }

    #[test]
    fn test_mod_directory_validation() {
        let dir = tempfile::tempdir().unwrap();
        let valid = Config {
            mod_directory: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        assert_eq!(valid.validated_mod_directory().unwrap(), Some(dir.path().to_path_buf()));

        let invalid = Config {
            mod_directory: Some(dir.path().join("absent")),
            ..Config::default()
        };
        assert!(matches!(
            invalid.validated_mod_directory(),
            Err(Error::ModDirectoryInvalid { .. })
        ));
        assert_eq!(Config::default().validated_mod_directory().unwrap(), None);
    }
}
