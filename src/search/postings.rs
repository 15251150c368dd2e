//! Inverted term index over an [`Index`] snapshot.

use std::collections::HashMap;

use crate::model::Index;

/// `token -> [(file ordinal, count)]`, with ordinals following index key order
#[derive(Debug, Default)]
pub struct Postings {
    paths: Vec<String>,
    by_token: HashMap<String, Vec<(usize, u64)>>,
}

impl Postings {
    pub fn from_index(index: &Index) -> Self {
        let mut by_token: HashMap<String, Vec<(usize, u64)>> = HashMap::new();
        let mut paths = Vec::with_capacity(index.len());

        for (ordinal, (path, summary)) in index.files.iter().enumerate() {
            paths.push(path.clone());
            for (token, &count) in &summary.terms {
                if count > 0 {
                    by_token.entry(token.clone()).or_default().push((ordinal, count));
                }
            }
        }

        Self { paths, by_token }
    }

    pub fn path(&self, ordinal: usize) -> Option<&str> {
        self.paths.get(ordinal).map(String::as_str)
    }

    /// Number of distinct indexed tokens
    pub fn vocabulary_len(&self) -> usize {
        self.by_token.len()
    }

    /// Score every file matching at least one of `tokens`.
    ///
    /// A token repeated in the query counts once per repetition. Returned
    /// pairs are ordered by score descending, then ordinal (path) ascending.
    pub fn score(&self, tokens: &[String]) -> Vec<(usize, u64)> {
        let mut scores: HashMap<usize, u64> = HashMap::new();
        for token in tokens {
            if let Some(list) = self.by_token.get(token) {
                for &(ordinal, count) in list {
                    *scores.entry(ordinal).or_insert(0) += count;
                }
            }
        }

        let mut ranked: Vec<(usize, u64)> = scores.into_iter().filter(|&(_, s)| s > 0).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}
