pub mod analyzer;
pub mod terms;
pub mod walker;

pub use analyzer::{Analysis, Analyzer, ParserRegistry, StructuralParser};
pub use terms::{term_frequencies, tokenize};
pub use walker::{ExcludeRules, ScanWarning, SourceFiles, Walker};
