use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use swarm_index::{BuildOutcome, Config, IndexBuilder, QueryEngine};

/// A throwaway project directory with helpers to build and query it
pub struct TestHarness {
    pub temp_dir: TempDir,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            config: Config::default(),
        })
    }

    pub fn create_test_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn remove_test_file(&self, path: &str) -> Result<()> {
        std::fs::remove_file(self.temp_dir.path().join(path))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn index_path(&self) -> PathBuf {
        self.config.index_path(self.path())
    }

    /// Full build to the default location
    pub fn build(&self) -> Result<BuildOutcome> {
        Ok(IndexBuilder::new(self.path(), self.config.clone()).build(None)?)
    }

    /// Query engine over whatever is currently persisted
    pub fn engine(&self) -> QueryEngine {
        QueryEngine::open_with_config(self.path(), &self.config)
    }
}
