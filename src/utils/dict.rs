//! Character table loading.
//!
//! A [`Charset`] maps recognizer class indices to output strings. Index 0 is
//! reserved for the CTC blank token.

use crate::core::OCRError;
use std::path::Path;
use tracing::{debug, info};

/// Placeholder stored in the blank slot of the built-in table.
pub const BLANK_TOKEN: &str = "blank";

/// Symbols following the digits in the built-in table.
const SYMBOLS_AFTER_DIGITS: &[&str] = &[":", ";", "<", "=", ">", "?", "@"];
/// Symbols following the upper-case letters.
const SYMBOLS_AFTER_UPPER: &[&str] = &["[", "\\", "]", "^", "_", "`"];
/// Symbols following the lower-case letters, ending with space.
const SYMBOLS_AFTER_LOWER: &[&str] = &[
    "{", "|", "}", "~", "!", "\"", "#", "$", "%", "&", "'", "(", ")", "*", "+", ",", "-", ".",
    "/", " ",
];

/// Ordered index-to-string table used by the CTC decoder.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    entries: Vec<String>,
}

impl Charset {
    /// Wraps an explicit entry list. Entry 0 is treated as the blank slot.
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Builds the built-in table.
    ///
    /// Layout: blank, `0-9`, `:;<=>?@`, `A-Z`, ``[\]^_` ``, `a-z`,
    /// `{|}~!"#$%&'()*+,-./` and a trailing space.
    pub fn default_table() -> Self {
        let digits = ('0'..='9').map(String::from);
        let upper = ('A'..='Z').map(String::from);
        let lower = ('a'..='z').map(String::from);
        let symbols = |set: &'static [&'static str]| set.iter().map(|s| (*s).to_string());

        let entries = std::iter::once(BLANK_TOKEN.to_string())
            .chain(digits)
            .chain(symbols(SYMBOLS_AFTER_DIGITS))
            .chain(upper)
            .chain(symbols(SYMBOLS_AFTER_UPPER))
            .chain(lower)
            .chain(symbols(SYMBOLS_AFTER_LOWER))
            .collect();
        Self { entries }
    }

    /// Reads one entry per line.
    ///
    /// Lines are kept verbatim, including empty ones; the first line occupies
    /// the blank slot. An empty file yields the built-in table.
    ///
    /// # Errors
    ///
    /// Returns `OCRError::ConfigError` if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, OCRError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OCRError::config_error_detailed(
                "charset",
                format!("failed to open charset file '{}': {}", path.display(), e),
            )
        })?;
        let entries: Vec<String> = content.lines().map(|s| s.to_string()).collect();
        if entries.is_empty() {
            info!(
                "charset file {} is empty, using built-in table",
                path.display()
            );
            return Ok(Self::default_table());
        }
        debug!("loaded {} charset entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// Loads from `path` when one is configured, otherwise builds the default.
    ///
    /// An empty path is treated the same as no path.
    pub fn load(path: Option<&Path>) -> Result<Self, OCRError> {
        match path {
            Some(path) if !path.as_os_str().is_empty() => Self::from_file(path),
            _ => Ok(Self::default_table()),
        }
    }

    /// Returns entry `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Number of entries, blank slot included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::default_table()
    }
}
