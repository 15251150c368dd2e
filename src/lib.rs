pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod indexer;
pub mod indexing;
pub mod logging;
pub mod model;
pub mod search;
pub mod storage;
pub mod watcher;

pub use config::Config;
pub use error::{BuildReport, DegradedFile, IndexError, ProcessingStage};
pub use indexing::{build_index, load_index, BuildOutcome, IndexBuilder};
pub use model::{FileSummary, Index, Symbol};
pub use search::{FileHit, QueryEngine, SymbolHit, TextHit};
pub use storage::IndexStore;
