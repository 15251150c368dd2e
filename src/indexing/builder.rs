//! Full index build: sequential scan, parallel analysis, single merge, atomic save.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{BuildReport, DegradedFile, IndexError, ProcessingStage, Result};
use crate::indexer::{term_frequencies, Analyzer, ParserRegistry, Walker};
use crate::model::{index_key, FileSummary, Index};
use crate::storage::IndexStore;

/// Everything a build produced, including a failed save
#[derive(Debug)]
pub struct BuildOutcome {
    pub index: Index,
    pub report: BuildReport,
    /// Where the index was (or would have been) written
    pub output_path: PathBuf,
    /// Set when the index could not be saved; `index` is still valid
    pub persist_error: Option<IndexError>,
}

impl BuildOutcome {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// One analyzed file on its way into the index
struct FileResult {
    key: String,
    summary: FileSummary,
    degraded: Vec<DegradedFile>,
}

/// Builds a complete [`Index`] for one project root
pub struct IndexBuilder {
    root: PathBuf,
    config: Config,
    registry: Arc<ParserRegistry>,
    cancel: CancellationToken,
    progress: bool,
}

impl IndexBuilder {
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            registry: Arc::new(ParserRegistry::new()),
            cancel: CancellationToken::new(),
            progress: false,
        }
    }

    /// Abort the build when `token` is cancelled. Checked before each file.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Show a terminal progress bar while analyzing
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn with_registry(mut self, registry: Arc<ParserRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Default output location for this project
    pub fn default_output(&self) -> PathBuf {
        self.config.index_path(&self.root)
    }

    /// Run the build and persist to `output` (or the project default).
    ///
    /// Only a missing root, bad configuration or cancellation fail the call.
    /// Per-file problems end up in the report and a failed save in
    /// `persist_error`.
    pub fn build(&self, output: Option<&Path>) -> Result<BuildOutcome> {
        let start = Instant::now();
        self.config.indexer.validate()?;

        // Stage 1: discovery (sequential)
        let walker = Walker::new(&self.root, &self.config.indexer);
        let mut source_files = walker.scan()?;
        let files: Vec<PathBuf> = source_files.by_ref().collect();
        let mut degraded: Vec<DegradedFile> = source_files
            .into_warnings()
            .into_iter()
            .map(|w| {
                let path = w
                    .path
                    .as_deref()
                    .and_then(|p| p.strip_prefix(&self.root).ok())
                    .map(Path::to_path_buf)
                    .or(w.path)
                    .unwrap_or_default();
                DegradedFile::new(path, ProcessingStage::Scan, w.message)
            })
            .collect();

        info!("Indexing {} files under {:?}", files.len(), self.root);

        // Stage 2: analysis (parallel, one analyzer per worker)
        let results = self.analyze_files(&files)?;

        if self.cancel.is_cancelled() {
            info!("Index build cancelled, nothing persisted");
            return Err(IndexError::Cancelled);
        }

        // Stage 3: merge. Keys are disjoint, insertion order does not matter.
        let mut index = Index::new();
        for result in results {
            degraded.extend(result.degraded);
            index.files.insert(result.key, result.summary);
        }

        let report = BuildReport::new(index.len(), degraded);
        for file in &report.degraded {
            warn!("Degraded {} at {} stage: {}", file.path.display(), file.stage, file.reason);
        }

        // Stage 4: persistence
        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_output());
        let persist_error = match IndexStore::at(&output_path).save(&index) {
            Ok(()) => None,
            Err(e) => {
                warn!("Index built but not saved: {}", e);
                Some(e)
            }
        };

        info!(
            "{} in {:.2}s ({} symbols)",
            report.summary(),
            start.elapsed().as_secs_f64(),
            index.symbol_count()
        );

        Ok(BuildOutcome {
            index,
            report,
            output_path,
            persist_error,
        })
    }

    fn analyze_files(&self, files: &[PathBuf]) -> Result<Vec<FileResult>> {
        let progress = self.create_progress_bar(files.len());
        let max_bytes = self.config.indexer.max_file_bytes;
        let threads = self
            .config
            .indexer
            .parallel_threads
            .unwrap_or_else(num_cpus::get);
        debug!("Analyzing {} files on {} threads", files.len(), threads);

        let run = || -> Vec<Option<FileResult>> {
            files
                .par_iter()
                .map_init(
                    || Analyzer::with_registry(Arc::clone(&self.registry)),
                    |analyzer, rel| {
                        if self.cancel.is_cancelled() {
                            return None;
                        }
                        let result = analyze_file(analyzer, &self.root, rel, max_bytes);
                        progress.inc(1);
                        Some(result)
                    },
                )
                .collect()
        };

        let results = match self.config.indexer.parallel_threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| IndexError::InvalidConfig {
                    reason: format!("cannot start {} analyzer threads: {}", threads, e),
                })?
                .install(run),
            None => run(),
        };

        progress.finish_and_clear();

        if results.iter().any(Option::is_none) {
            return Err(IndexError::Cancelled);
        }
        Ok(results.into_iter().flatten().collect())
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Read and analyze one file. Never fails: problems become degraded entries.
fn analyze_file(analyzer: &mut Analyzer, root: &Path, rel: &Path, max_bytes: u64) -> FileResult {
    let key = index_key(rel);
    let abs = root.join(rel);

    let bytes = match fs::read(&abs) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to read {:?}: {}", abs, e);
            return FileResult {
                key,
                summary: FileSummary::default(),
                degraded: vec![DegradedFile::new(rel, ProcessingStage::FileRead, e.to_string())],
            };
        }
    };
    let content = String::from_utf8_lossy(&bytes);

    if bytes.len() as u64 > max_bytes {
        return FileResult {
            key,
            summary: FileSummary::terms_only(term_frequencies(&content)),
            degraded: vec![DegradedFile::new(
                rel,
                ProcessingStage::FileRead,
                format!("{} bytes exceeds limit of {}, indexed terms only", bytes.len(), max_bytes),
            )],
        };
    }

    let analysis = analyzer.analyze(rel, &content);
    debug!(
        "Analyzed {} ({} symbols, {} terms)",
        key,
        analysis.summary.symbols.len(),
        analysis.summary.terms.len()
    );

    FileResult {
        key,
        summary: analysis.summary,
        degraded: analysis.degraded.into_iter().collect(),
    }
}

/// Build and persist the index for `root`.
///
/// Uses `.cswarm/config.toml` when present and valid, defaults otherwise.
/// A failed save is logged and the in-memory index is still returned.
pub fn build_index(root: &Path, output: Option<&Path>) -> Result<Index> {
    let config = project_config(root);
    let outcome = IndexBuilder::new(root, config).build(output)?;
    Ok(outcome.index)
}

/// Load the persisted index for `root`, or an empty index if there is none.
pub fn load_index(root: &Path) -> Index {
    IndexStore::for_project(root, &project_config(root)).load_or_empty()
}

fn project_config(root: &Path) -> Config {
    Config::load(root).unwrap_or_else(|e| {
        warn!("Using default configuration: {:#}", e);
        Config::default()
    })
}
