//! Manifest error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing a clip manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A non-blank line is not a `file '<path>'` entry.
    #[error("Malformed manifest entry on line {line_number}: {line}")]
    Malformed { line_number: usize, line: String },

    /// File I/O error.
    #[error("I/O error on manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ManifestError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;
