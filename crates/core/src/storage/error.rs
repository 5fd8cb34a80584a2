//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Report size exceeds maximum allowed.
    #[error("report size {size} bytes exceeds maximum allowed {max} bytes")]
    ReportTooLarge {
        /// Actual report size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// OpenDAL operation error.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Create a report too large error.
    #[must_use]
    pub fn report_too_large(size: u64, max: u64) -> Self {
        Self::ReportTooLarge { size, max }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::Operation(err.to_string())
    }
}
