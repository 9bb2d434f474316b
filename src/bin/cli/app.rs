use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mahir_lib::config::AppConfig;
use mahir_lib::study::{StudySet, StudySetStorage};

use crate::OutputFormat;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub format: OutputFormat,
    pub use_color: bool,
    seed: Option<u64>,
}

impl App {
    pub fn new(
        config_path: Option<&Path>,
        format: Option<OutputFormat>,
        no_color: bool,
        seed: Option<u64>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AppConfig::load_default().context("Failed to load config")?,
        };

        let format = format.unwrap_or(if config.json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        });
        let use_color = !no_color && config.color && crate::atty_check();
        let seed = seed.or(config.seed);

        Ok(Self {
            config,
            format,
            use_color,
            seed,
        })
    }

    /// Storage for the given set path, or the configured default set
    pub fn storage(&self, set: Option<PathBuf>) -> Result<StudySetStorage> {
        let path = match set.or_else(|| self.config.default_set.clone()) {
            Some(path) => path,
            None => bail!("No set file given and no default_set configured"),
        };
        Ok(StudySetStorage::new(path))
    }

    /// Load a set for a command
    pub fn load(&self, storage: &StudySetStorage) -> Result<StudySet> {
        storage
            .load()
            .with_context(|| format!("Failed to load set {}", storage.path().display()))
    }

    pub fn save(&self, storage: &StudySetStorage, set: &StudySet) -> Result<()> {
        storage
            .save(set)
            .with_context(|| format!("Failed to save set {}", storage.path().display()))
    }

    /// Random source for shuffles; `offset` separates independent streams
    pub fn rng(&self, offset: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(offset)),
            None => StdRng::from_entropy(),
        }
    }
}
