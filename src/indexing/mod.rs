//! Whole-project index builds

pub mod builder;

pub use builder::{build_index, load_index, BuildOutcome, IndexBuilder};
