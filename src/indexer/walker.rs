use ignore::{Walk, WalkBuilder};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use crate::config::IndexerConfig;
use crate::error::{IndexError, Result};

/// Directory exclusion policy shared by the scanner and the watcher
#[derive(Debug, Clone)]
pub struct ExcludeRules {
    dirs: HashSet<String>,
    hidden_marker: String,
}

impl ExcludeRules {
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            dirs: config.exclude_dirs.iter().cloned().collect(),
            hidden_marker: config.hidden_marker.clone(),
        }
    }

    /// Whether a single directory name is excluded
    pub fn excludes_dir_name(&self, name: &str) -> bool {
        self.dirs.contains(name)
            || (!self.hidden_marker.is_empty() && name.starts_with(&self.hidden_marker))
    }

    /// Whether any ancestor directory of a root-relative file path is excluded.
    ///
    /// The file name itself is not checked: `.hidden.py` at the root is kept,
    /// `a/.hidden/b/file.py` is not.
    pub fn excludes_path(&self, rel_path: &Path) -> bool {
        let Some(parent) = rel_path.parent() else {
            return false;
        };
        parent
            .components()
            .any(|c| self.excludes_dir_name(&c.as_os_str().to_string_lossy()))
    }
}

/// A directory or entry that could not be read during a scan
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: Option<PathBuf>,
    pub message: String,
}

/// Walks a project tree and yields root-relative source file paths
pub struct Walker {
    root: PathBuf,
    extensions: Arc<HashSet<String>>,
    rules: Arc<ExcludeRules>,
    respect_gitignore: bool,
}

impl Walker {
    /// Create a new Walker with the given root directory and configuration
    pub fn new(root: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            root: root.into(),
            extensions: Arc::new(config.extensions.iter().cloned().collect()),
            rules: Arc::new(ExcludeRules::from_config(config)),
            respect_gitignore: config.respect_gitignore,
        }
    }

    /// Start a fresh walk.
    ///
    /// Entries are visited in sorted file-name order inside each directory, so
    /// the sequence is stable across runs. Calling `scan` again restarts it.
    pub fn scan(&self) -> Result<SourceFiles> {
        if !self.root.is_dir() {
            return Err(IndexError::NotFound {
                path: self.root.clone(),
            });
        }

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a: &OsStr, b: &OsStr| a.cmp(b));

        let rules = Arc::clone(&self.rules);
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            !(is_dir && rules.excludes_dir_name(&entry.file_name().to_string_lossy()))
        });

        Ok(SourceFiles {
            root: self.root.clone(),
            walk: builder.build(),
            extensions: Arc::clone(&self.extensions),
            rules: Arc::clone(&self.rules),
            warnings: Vec::new(),
        })
    }

    /// Collect all source files into a Vec, discarding warnings
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.scan()?.collect())
    }
}

/// Lazy sequence of source files produced by [`Walker::scan`]
pub struct SourceFiles {
    root: PathBuf,
    walk: Walk,
    extensions: Arc<HashSet<String>>,
    rules: Arc<ExcludeRules>,
    warnings: Vec<ScanWarning>,
}

impl SourceFiles {
    /// Warnings gathered during the walk (complete once the iterator is exhausted)
    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| self.extensions.contains(ext))
            .unwrap_or(false)
    }
}

impl Iterator for SourceFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = error_path(&err);
                    warn!("Skipping unreadable entry {:?}: {}", path, err);
                    self.warnings.push(ScanWarning {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };

            if self.rules.excludes_path(rel) || !self.has_extension(rel) {
                continue;
            }

            return Some(rel.to_path_buf());
        }
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}
