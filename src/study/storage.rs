//! File storage for a study set
//!
//! A set is one JSON document, read whole when a session starts and written
//! whole when it ends. Writes go to a `.tmp` sibling first and are renamed
//! into place so an interrupted save never leaves a truncated set behind.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{Result, StudyError};
use super::models::StudySet;

/// Storage for a single study set file
pub struct StudySetStorage {
    path: PathBuf,
}

impl StudySetStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the set
    pub fn load(&self) -> Result<StudySet> {
        let content = fs::read_to_string(&self.path)?;
        let set: StudySet = serde_json::from_str(&content)?;
        log::debug!(
            "Loaded set '{}' with {} terms from {:?}",
            set.name,
            set.terms_dict.len(),
            self.path
        );
        Ok(set)
    }

    /// Save the set using atomic write (write to .tmp then rename)
    pub fn save(&self, set: &StudySet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let mut json = serde_json::to_string_pretty(set)?;
        json.push('\n');
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        log::debug!("Saved set '{}' to {:?}", set.name, self.path);
        Ok(())
    }

    /// Create a new set file, refusing to overwrite an existing one
    pub fn create(&self, set: &StudySet) -> Result<()> {
        if self.exists() {
            return Err(StudyError::Configuration(format!(
                "{} already exists",
                self.path.display()
            )));
        }
        self.save(set)
    }
}
