//! Error taxonomy for indexing and querying.
//!
//! Only root-level problems surface as `Err`. Per-file problems during a build
//! are collected as [`DegradedFile`] values and reported in a [`BuildReport`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the indexing core.
#[derive(Error, Debug)]
pub enum IndexError {
    /// The project root (or a queried path) does not exist.
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    /// Structural parsing failed for one file; lexical data is still available.
    #[error("structural parse degraded for {path}: {reason}")]
    ParseDegraded { path: PathBuf, reason: String },

    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index could not be written.
    #[error("failed to persist index to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index could not be (de)serialized.
    #[error("index serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The build was cancelled before it finished.
    #[error("index build cancelled")]
    Cancelled,

    /// Configuration values are unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// Stage at which a file was degraded during a build
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum ProcessingStage {
    Scan,
    FileRead,
    Parse,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Scan => write!(f, "Scan"),
            ProcessingStage::FileRead => write!(f, "File Read"),
            ProcessingStage::Parse => write!(f, "Parse"),
        }
    }
}

/// A path that was indexed with reduced information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedFile {
    pub path: PathBuf,
    pub stage: ProcessingStage,
    pub reason: String,
}

impl DegradedFile {
    pub fn new(path: impl Into<PathBuf>, stage: ProcessingStage, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stage,
            reason: reason.into(),
        }
    }
}

/// Per-build summary of degraded files, grouped by stage
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub files_indexed: usize,
    pub degraded: Vec<DegradedFile>,
}

impl BuildReport {
    pub fn new(files_indexed: usize, mut degraded: Vec<DegradedFile>) -> Self {
        degraded.sort_by(|a, b| a.path.cmp(&b.path).then(a.stage.cmp(&b.stage)));
        Self {
            files_indexed,
            degraded,
        }
    }

    pub fn has_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }

    pub fn by_stage(&self) -> BTreeMap<ProcessingStage, Vec<&DegradedFile>> {
        let mut grouped: BTreeMap<ProcessingStage, Vec<&DegradedFile>> = BTreeMap::new();
        for file in &self.degraded {
            grouped.entry(file.stage).or_default().push(file);
        }
        grouped
    }

    pub fn summary(&self) -> String {
        if self.degraded.is_empty() {
            format!("Indexed {} files", self.files_indexed)
        } else {
            format!(
                "Indexed {} files, {} degraded",
                self.files_indexed,
                self.degraded.len()
            )
        }
    }

    /// Print the summary and up to five examples per stage to stdout
    pub fn print_summary(&self) {
        println!("{}", self.summary());

        for (stage, files) in self.by_stage() {
            println!("  {}: {} files", stage, files.len());

            for file in files.iter().take(5) {
                println!("    - {}: {}", file.path.display(), file.reason);
            }

            if files.len() > 5 {
                println!("    ... and {} more", files.len() - 5);
            }
        }
    }
}
