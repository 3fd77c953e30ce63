use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library store and its table format.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Bad input: out-of-range rating, non-numeric text, unknown id on update.
    #[error("{0}")]
    Validation(String),

    #[error("track {0} not found")]
    NotFound(String),

    /// The persisted table contains rows that cannot be parsed.
    #[error("{0}")]
    Malformed(MalformedRows),

    #[error("I/O error on {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A row of the persisted table that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// 1-based line number in the file.
    pub line: u64,
    pub reason: String,
}

/// Every malformed row found in one load, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRows(pub Vec<MalformedRow>);

impl MalformedRows {
    pub fn rows(&self) -> &[MalformedRow] {
        &self.0
    }
}

impl fmt::Display for MalformedRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} malformed row(s) in library", self.0.len())?;
        for row in &self.0 {
            write!(f, "; line {}: {}", row.line, row.reason)?;
        }
        Ok(())
    }
}
