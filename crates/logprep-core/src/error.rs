use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by logprep.
#[derive(Error, Debug)]
pub enum PrepError {
    /// An input file does not exist on disk.
    #[error("File not found: {0}")]
    FileMissing(PathBuf),

    /// A CSV input could not be parsed into a table.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// An output file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A JSON document could not be serialized.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the logprep crates.
pub type Result<T> = std::result::Result<T, PrepError>;
