//! Error types for starfield

use thiserror::Error;

/// Main error type for starfield operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed point buffer for '{title}': {reason}")]
    MalformedBuffer { title: String, reason: String },

    #[error("Dataset already registered: {0}")]
    DuplicateDataset(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for starfield operations
pub type Result<T> = std::result::Result<T, Error>;
