use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the fleet log scanner.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the configured text encodings could decode the file.
    #[error("Failed to decode {path} (tried {tried})")]
    Decode { path: PathBuf, tried: String },

    /// The input log directory does not exist.
    #[error("Log directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the fleetlog crates.
pub type Result<T> = std::result::Result<T, ScanError>;
