//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while decoding point buffers
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Truncated float: {len} bytes is not a multiple of 4")]
    TruncatedFloat { len: usize },

    #[error("Partial point: {floats} floats is not a multiple of 3")]
    PartialPoint { floats: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Attach the dataset title and lift into the crate-wide error
    pub fn for_dataset(self, title: &str) -> starfield_core::Error {
        match self {
            IoError::Io(e) => starfield_core::Error::Io(e),
            other => starfield_core::Error::MalformedBuffer {
                title: title.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
