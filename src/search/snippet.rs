//! Source excerpts read from the working tree at query time.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::IndexError;

/// Lines shown before a symbol's declaration line
pub const SYMBOL_LOOKBACK: usize = 5;
/// Lines in a symbol snippet
pub const SYMBOL_WINDOW: usize = 20;
/// Lines in a path lookup snippet
pub const PATH_WINDOW: usize = 200;
/// Lines in a free-text result snippet
pub const TEXT_WINDOW: usize = 40;

/// Reads line windows of project files relative to a root
#[derive(Debug, Clone)]
pub struct SourceReader {
    root: PathBuf,
}

impl SourceReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Lines `[start, start + count)` (0-based) joined by `\n`.
    ///
    /// A file that cannot be read yields an empty string.
    pub fn window(&self, rel_path: &str, start: usize, count: usize) -> String {
        match self.read(rel_path) {
            Ok(text) => split_lines(&text)
                .skip(start)
                .take(count)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                debug!("Empty snippet: {}", e);
                String::new()
            }
        }
    }

    /// Window around a 1-based declaration line
    pub fn around_line(&self, rel_path: &str, lineno: usize) -> String {
        self.window(rel_path, lineno.saturating_sub(SYMBOL_LOOKBACK), SYMBOL_WINDOW)
    }

    /// First `count` lines of a file
    pub fn head(&self, rel_path: &str, count: usize) -> String {
        self.window(rel_path, 0, count)
    }

    fn read(&self, rel_path: &str) -> Result<String, IndexError> {
        let path = self.root.join(rel_path);
        fs::read(&path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|source| IndexError::IoUnavailable { path, source })
    }
}

/// Split on every line boundary Python's `str.splitlines` recognizes.
///
/// `\r\n` counts as one boundary; a trailing terminator does not start an
/// extra empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((at, c)) => {
                let line = &rest[..at];
                let mut next = at + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}
