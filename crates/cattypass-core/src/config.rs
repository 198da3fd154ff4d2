//! Configuration file handling.
//!
//! Reads from `~/.config/cattypass/cattypass.toml`

use crate::generator::DEFAULT_PASSWORD_LENGTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the storage area file holding the passwords.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// Directory exports are saved into.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Length of generated passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,
    /// Whether listings show passwords in clear text.
    #[serde(default)]
    pub show_passwords: bool,
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cattypass")
        .join("storage.json")
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_password_length() -> usize {
    DEFAULT_PASSWORD_LENGTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            export_dir: default_export_dir(),
            password_length: default_password_length(),
            show_passwords: false,
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            if !is_custom {
                let config = Config::default();
                config.save_to(&config_path)?;
                tracing::info!("Created default config: {:?}", config);
                return Ok(config);
            } else {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
        }

        let config = Self::read_from(&config_path)?;
        tracing::info!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Parse a config file without creating anything.
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Get the path to the config file.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("cattypass").join("cattypass.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cattypass.toml");
        std::fs::write(&path, "storage_path = \"/tmp/pw.json\"\n").unwrap();

        let config = Config::read_from(&path).unwrap();
        assert_eq!(config.storage_path, PathBuf::from("/tmp/pw.json"));
        assert_eq!(config.password_length, DEFAULT_PASSWORD_LENGTH);
        assert!(!config.show_passwords);
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("cattypass.toml");
        let config = Config {
            storage_path: PathBuf::from("/data/storage.json"),
            export_dir: PathBuf::from("/data/exports"),
            password_length: 24,
            show_passwords: true,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::read_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_custom_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "password_length = \"long\"").unwrap();
        assert!(Config::load(Some(path)).is_err());
    }
}
