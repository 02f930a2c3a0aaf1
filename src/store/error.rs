//! Error types for object storage operations

use std::fmt;

/// Result type alias for object storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the object store
#[derive(Debug)]
pub enum StoreError {
    /// The put request was rejected or never reached the service
    PutFailed(String),

    /// Invalid bucket/endpoint configuration
    InvalidConfig(String),

    /// I/O error (reading the local file, etc.)
    IoError(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PutFailed(msg) => write!(f, "failed to put object: {}", msg),
            StoreError::InvalidConfig(msg) => write!(f, "invalid store configuration: {}", msg),
            StoreError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::IoError(e)
    }
}
