//! Error types for csync-core

use crate::provider::ProviderError;

/// Result type for csync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// User-correctable configuration problem; never retried.
    #[error("{message}")]
    Configuration { message: String },

    /// Remote provider failure, possibly retryable (rate-limit class).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Invalid glob pattern in an include/exclude/ignore list
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Filesystem error from csync-fs
    #[error(transparent)]
    Fs(#[from] csync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
