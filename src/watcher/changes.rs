//! Classification of debounced file system events.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify_debouncer_full::DebouncedEvent;

use crate::config::{IndexerConfig, META_DIR};
use crate::indexer::ExcludeRules;

/// Types of file system changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Created,
    Modified,
    Deleted,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Created => write!(f, "created"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
        }
    }
}

/// A change to an indexable file, with a root-relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub change_type: ChangeType,
}

impl FileChange {
    pub fn new(path: PathBuf, change_type: ChangeType) -> Self {
        Self { path, change_type }
    }
}

/// Decides which event paths can affect the index
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    root: PathBuf,
    extensions: Vec<String>,
    rules: ExcludeRules,
}

impl ChangeFilter {
    pub fn new(root: impl Into<PathBuf>, config: &IndexerConfig) -> Self {
        Self {
            root: root.into(),
            extensions: config.extensions.clone(),
            rules: ExcludeRules::from_config(config),
        }
    }

    /// Root-relative path if `path` would be part of a scan
    pub fn relevant(&self, path: &Path) -> Option<PathBuf> {
        let rel = path.strip_prefix(&self.root).ok()?;

        // The index itself lives here; never react to our own writes
        if rel.components().next().is_some_and(|c| c.as_os_str() == META_DIR) {
            return None;
        }
        if self.rules.excludes_path(rel) {
            return None;
        }

        let ext = rel.extension().and_then(|e| e.to_str())?;
        self.extensions
            .iter()
            .any(|e| e == ext)
            .then(|| rel.to_path_buf())
    }

    /// Collapse a debounced batch into one change per relevant path (last event wins).
    pub fn classify(&self, events: &[DebouncedEvent]) -> Vec<FileChange> {
        let mut latest: BTreeMap<PathBuf, ChangeType> = BTreeMap::new();

        for event in events {
            let change_type = match &event.kind {
                EventKind::Create(_) => ChangeType::Created,
                EventKind::Modify(_) => ChangeType::Modified,
                EventKind::Remove(_) => ChangeType::Deleted,
                _ => continue,
            };

            for path in &event.paths {
                if path.is_dir() {
                    continue;
                }
                if let Some(rel) = self.relevant(path) {
                    latest.insert(rel, change_type);
                }
            }
        }

        latest
            .into_iter()
            .map(|(path, change_type)| FileChange::new(path, change_type))
            .collect()
    }
}
