use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::IndexError;

/// Project metadata directory, holding the index and optional config
pub const META_DIR: &str = ".cswarm";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// File extensions to index
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped together with their whole subtree
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Directories whose name starts with this marker are skipped (empty disables)
    #[serde(default = "default_hidden_marker")]
    pub hidden_marker: String,

    /// Also honour .gitignore files
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Number of analyzer threads (None = rayon default)
    #[serde(default)]
    pub parallel_threads: Option<usize>,

    /// Files above this size are indexed lexically only
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            hidden_marker: default_hidden_marker(),
            respect_gitignore: false,
            parallel_threads: None,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl IndexerConfig {
    pub fn validate(&self) -> std::result::Result<(), IndexError> {
        if self.extensions.is_empty() {
            return Err(IndexError::InvalidConfig {
                reason: "indexer.extensions must not be empty".to_string(),
            });
        }
        if self.parallel_threads == Some(0) {
            return Err(IndexError::InvalidConfig {
                reason: "indexer.parallel_threads must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string(), "rs".to_string(), "go".to_string()]
}

fn default_exclude_dirs() -> Vec<String> {
    vec![
        ".git".to_string(),
        META_DIR.to_string(),
        "venv".to_string(),
        ".venv".to_string(),
        "__pycache__".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
    ]
}

fn default_hidden_marker() -> String {
    ".".to_string()
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Index file name (relative to .cswarm/)
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_file: default_index_file(),
        }
    }
}

fn default_index_file() -> String {
    "index.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default number of free-text results
    #[serde(default = "default_query_limit")]
    pub default_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_query_limit(),
        }
    }
}

fn default_query_limit() -> usize {
    crate::search::DEFAULT_TEXT_LIMIT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rolling files
    #[serde(default)]
    pub enabled: bool,

    /// Write logs to stderr
    #[serde(default = "default_true")]
    pub stderr: bool,

    /// Level for the file layer: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the project root unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// hourly, daily, minutely or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: true,
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_file_prefix(),
            rotation: default_rotation(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(META_DIR).join("logs")
}

fn default_file_prefix() -> String {
    "swarm-index.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .cswarm directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::meta_dir(root).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?;
            config.indexer.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get the path to the .cswarm directory
    pub fn meta_dir(root: &Path) -> PathBuf {
        root.join(META_DIR)
    }

    /// Default location of the persisted index
    pub fn index_path(&self, root: &Path) -> PathBuf {
        Self::meta_dir(root).join(&self.storage.index_file)
    }
}
