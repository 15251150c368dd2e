//! Lexical term extraction shared by the analyzer and free-text queries.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Minimum token length counted as a term
pub const MIN_TERM_LEN: usize = 3;

lazy_static! {
    static ref TERM_RE: Regex = Regex::new(r"[a-z_]{3,}").expect("valid term regex");
}

/// Lowercase `text` and return every run of ASCII letters/underscore of length >= 3,
/// in order, duplicates kept.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Count term occurrences in `text`
pub fn term_frequencies(text: &str) -> BTreeMap<String, u64> {
    let mut terms = BTreeMap::new();
    for token in tokenize(text) {
        *terms.entry(token).or_insert(0) += 1;
    }
    terms
}
