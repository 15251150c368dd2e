//! Persistence of the index as a single JSON document.
//!
//! Writes go to a sibling temp file which is synced and renamed over the
//! target, so readers only ever observe a complete snapshot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::model::Index;

/// Handle on the on-disk location of one project's index
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    /// Store backed by an explicit file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured location inside the project's metadata directory
    pub fn for_project(root: &Path, config: &Config) -> Self {
        Self::at(config.index_path(root))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "index.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Save the index using atomic file operations.
    pub fn save(&self, index: &Index) -> Result<()> {
        let persistence = |source: std::io::Error| IndexError::Persistence {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persistence)?;
        }

        // serde_json's pretty printer indents with two spaces
        let content = serde_json::to_string_pretty(index)?;

        // Write to a temporary file first, then rename for atomicity
        let temp_path = self.temp_path();
        let written = fs::File::create(&temp_path).and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        });

        if let Err(e) = written.and_then(|()| fs::rename(&temp_path, &self.path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(persistence(e));
        }

        debug!("Saved index with {} files to {:?}", index.len(), self.path);
        Ok(())
    }

    /// Load the index from disk. `Ok(None)` when no index has been written yet.
    pub fn load(&self) -> Result<Option<Index>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No existing index found at {:?}", self.path);
                return Ok(None);
            }
            Err(source) => {
                return Err(IndexError::IoUnavailable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let index: Index = serde_json::from_str(&content)?;
        Ok(Some(index))
    }

    /// Load the index, treating a missing, unreadable or corrupt file as empty.
    pub fn load_or_empty(&self) -> Index {
        match self.load() {
            Ok(Some(index)) => index,
            Ok(None) => Index::new(),
            Err(e) => {
                warn!("Ignoring unusable index at {:?}: {}", self.path, e);
                Index::new()
            }
        }
    }
}
