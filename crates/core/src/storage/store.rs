//! Report store implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{Builder, ErrorKind, Operator, services};
use tally_shared::config::StorageProvider;
use tally_shared::types::ReportId;
use tracing::debug;

use super::config::StorageConfig;
use super::error::StorageError;

/// Persists rendered reports.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Stores `bytes` under a new ID and returns it.
    async fn write(&self, bytes: Bytes) -> Result<ReportId, StorageError>;

    /// Reads a stored report; `Ok(None)` when the ID is unknown.
    async fn read(&self, id: ReportId) -> Result<Option<Bytes>, StorageError>;
}

/// [`ReportStore`] backed by an OpenDAL operator.
pub struct OpendalReportStore {
    operator: Operator,
    config: StorageConfig,
}

impl OpendalReportStore {
    /// Create a new report store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::Memory => finish(services::Memory::default()),
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => finish(
                services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region),
            ),
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                finish(services::Fs::default().root(root))
            }
        }
    }

    /// Storage key for a report.
    ///
    /// Format: `reports/{report_id}.pdf`
    #[must_use]
    pub fn storage_key(id: ReportId) -> String {
        format!("reports/{id}.pdf")
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

fn finish<B: Builder>(builder: B) -> Result<Operator, StorageError> {
    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}

#[async_trait]
impl ReportStore for OpendalReportStore {
    async fn write(&self, bytes: Bytes) -> Result<ReportId, StorageError> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > self.config.max_report_size {
            return Err(StorageError::report_too_large(
                size,
                self.config.max_report_size,
            ));
        }

        let id = ReportId::new();
        let key = Self::storage_key(id);
        self.operator.write(&key, bytes).await?;
        debug!(report_id = %id, size, provider = self.provider_name(), "Stored report");

        Ok(id)
    }

    async fn read(&self, id: ReportId) -> Result<Option<Bytes>, StorageError> {
        match self.operator.read(&Self::storage_key(id)).await {
            Ok(buffer) => Ok(Some(buffer.to_bytes())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> OpendalReportStore {
        OpendalReportStore::from_config(StorageConfig::default()).expect("memory store")
    }

    #[test]
    fn test_storage_key() {
        let id: ReportId = "0190b8a0-0000-7000-8000-00000000000a".parse().expect("id");
        assert_eq!(
            OpendalReportStore::storage_key(id),
            "reports/0190b8a0-0000-7000-8000-00000000000a.pdf"
        );
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = memory_store();
        let pdf = Bytes::from_static(b"%PDF-1.7 test");

        let id = store.write(pdf.clone()).await.expect("write");
        let read = store.read(id).await.expect("read");

        assert_eq!(read, Some(pdf));
    }

    #[tokio::test]
    async fn test_each_write_gets_new_id() {
        let store = memory_store();
        let first = store.write(Bytes::from_static(b"one")).await.expect("write");
        let second = store.write(Bytes::from_static(b"two")).await.expect("write");

        assert_ne!(first, second);
        assert_eq!(store.read(first).await.expect("read"), Some(Bytes::from_static(b"one")));
    }

    #[tokio::test]
    async fn test_read_unknown_is_none() {
        let store = memory_store();
        assert_eq!(store.read(ReportId::new()).await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_rejects_oversized_report() {
        let store = OpendalReportStore::from_config(StorageConfig::default().with_max_report_size(4))
            .expect("memory store");

        let err = store
            .write(Bytes::from_static(b"too large"))
            .await
            .expect_err("oversized");
        assert!(matches!(err, StorageError::ReportTooLarge { size: 9, max: 4 }));
    }

    #[tokio::test]
    async fn test_local_fs_store() {
        let root = std::env::temp_dir().join(format!("tally-store-{}", ReportId::new()));
        let store = OpendalReportStore::from_config(StorageConfig::new(StorageProvider::local_fs(&root)))
            .expect("fs store");
        assert_eq!(store.provider_name(), "local");

        let id = store.write(Bytes::from_static(b"%PDF")).await.expect("write");
        assert!(root.join(OpendalReportStore::storage_key(id)).exists());
        assert_eq!(store.read(id).await.expect("read"), Some(Bytes::from_static(b"%PDF")));

        let _ = std::fs::remove_dir_all(root);
    }
}
