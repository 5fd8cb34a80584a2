//! Storage configuration types.

use tally_shared::config::StorageProvider;

/// Report store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Largest report accepted for storage, in bytes.
    pub max_report_size: u64,
}

impl StorageConfig {
    /// Default max report size: 20MB.
    pub const DEFAULT_MAX_REPORT_SIZE: u64 = 20 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_report_size: Self::DEFAULT_MAX_REPORT_SIZE,
        }
    }

    /// Set maximum report size.
    #[must_use]
    pub fn with_max_report_size(mut self, size: u64) -> Self {
        self.max_report_size = size;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(StorageProvider::Memory)
    }
}
