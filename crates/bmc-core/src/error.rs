//! Error types for BMC Core
//!
//! Provides error handling for:
//! - Input validation before any backend call
//! - Backend failures (wrapped [`ApiError`])
//! - Local state persistence
//! - Out-of-range version selection

use std::path::PathBuf;

use bmc_client::ApiError;

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Required input missing or invalid
    #[error("{0}")]
    Validation(String),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local state could not be read or written
    #[error("local state error: {0}")]
    Store(#[from] StoreError),

    /// Index outside the version list
    #[error("version {index} not found ({len} saved)")]
    VersionNotFound { index: usize, len: usize },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Create validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if error is retryable, as classified by [`ApiError::is_retryable`]
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Message shown to the user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Validation(msg)) | Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Key-value store error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing file could not be read or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored value is not valid JSON of the expected shape
    #[error("invalid stored JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    /// Create I/O error for a path
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;
