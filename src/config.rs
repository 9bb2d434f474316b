//! User configuration for the command line front end
//!
//! Read from `<config dir>/mahir/config.toml`. Every field is optional and a
//! missing file yields the defaults. Command line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Set file used when a command is given no path
    pub default_set: Option<PathBuf>,
    /// Colored terminal output
    pub color: bool,
    /// Print JSON instead of plain text
    pub json: bool,
    /// Seed for deck shuffles, for reproducible sessions
    pub seed: Option<u64>,
    /// Defaults for `init`
    pub new_set: NewSetDefaults,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_set: None,
            color: true,
            json: false,
            seed: None,
            new_set: NewSetDefaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSetDefaults {
    pub cycle_length: u32,
    pub deck_min: usize,
    /// Reset interval in cycles for scores 3 and 4
    pub nreset: u32,
    pub shuffle: bool,
}

impl Default for NewSetDefaults {
    fn default() -> Self {
        Self {
            cycle_length: 10,
            deck_min: 20,
            nreset: 1,
            shuffle: true,
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("mahir").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from the default location, falling back to defaults
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load(&path),
            Err(ConfigError::ConfigDirNotFound) => {
                log::debug!("No config directory, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.new_set.cycle_length, 10);
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "default_set = \"/data/hebrew.json\"\ncolor = false\n\n[new_set]\ndeck_min = 30\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.default_set, Some(PathBuf::from("/data/hebrew.json")));
        assert!(!config.color);
        assert!(!config.json);
        assert_eq!(config.new_set.deck_min, 30);
        assert_eq!(config.new_set.cycle_length, 10);
    }

    #[test]
    fn test_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "color = \"maybe\"").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Toml(_))));
    }
}
