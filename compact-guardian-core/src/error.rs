//! Error types for compact-guardian-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the compact-guardian-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Hook input could not be understood
    #[error("invalid hook input: {0}")]
    InvalidInput(String),

    /// Transcript path missing or not a regular file
    #[error("transcript not found: {}", .0.display())]
    TranscriptNotFound(PathBuf),

    /// The transcript pass failed part-way through
    #[error("failed to scan transcript {}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be written
    #[error("failed to write snapshot {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for compact-guardian-core
pub type Result<T> = std::result::Result<T, Error>;
