//! Query engine over a persisted index.
//!
//! This module contains:
//! - `postings` - Inverted `token -> (file, count)` lists for free-text ranking
//! - `snippet` - Line windows read from the live working tree
//! - `query` - `QueryEngine` with symbol, path and free-text lookups

pub mod postings;
pub mod query;
pub mod snippet;

pub use postings::Postings;
pub use query::{FileHit, QueryEngine, SymbolHit, TextHit, DEFAULT_TEXT_LIMIT};
pub use snippet::SourceReader;
