//! Error handling for sensor CSV reading operations.
//!
//! Fatal conditions only: unreadable files, bad configuration, frame
//! construction failures and incompatible schemas during aggregation.
//! Recoverable oddities in the data itself are logged, not raised.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("IO error for file: {path} - {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Unsupported encoding '{label}': only ASCII-compatible encodings can be read")]
    UnsupportedEncoding { label: String },

    #[error("Schema mismatch in file: {path} - expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to replace repaired file: {path} - {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReaderError {
    /// Attach the offending path to an I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
