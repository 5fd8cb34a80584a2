//! Report error types.

use tally_shared::AppError;
use tally_shared::types::{DecimalError, ReportId, ReportTemplateId};
use thiserror::Error;

use super::source::SourceError;
use crate::storage::StorageError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No budgets or no accounts were selected.
    #[error("At least one budget and one account must be selected")]
    EmptySelection,

    /// Export type other than html or pdf.
    #[error("Unsupported export type: {0:?}")]
    UnsupportedExportType(String),

    /// Template ID unknown.
    #[error("Report template not found: {0}")]
    TemplateNotFound(ReportTemplateId),

    /// Stored report ID unknown.
    #[error("Report not found: {0}")]
    ReportNotFound(ReportId),

    /// A stored amount is not a decimal number.
    #[error("Invalid decimal format in stored data: {0:?}")]
    InvalidDecimalFormat(String),

    /// Decimal arithmetic could not stay exact.
    #[error("Decimal error: {0}")]
    Decimal(DecimalError),

    /// Rendering service not configured, unreachable, or too slow.
    #[error("Render service unavailable: {0}")]
    RenderServiceUnavailable(String),

    /// Rendering service answered with a failure status.
    #[error("Render service error: status {status}: {message}")]
    RenderServiceError {
        /// HTTP status returned by the service.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Entity source failed.
    #[error("Report source error: {0}")]
    Source(String),

    /// Report storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ReportError {
    /// True when the caller's input caused the failure.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::EmptySelection
                | Self::UnsupportedExportType(_)
                | Self::TemplateNotFound(_)
                | Self::ReportNotFound(_)
        )
    }
}

impl From<DecimalError> for ReportError {
    fn from(err: DecimalError) -> Self {
        match err {
            DecimalError::InvalidFormat(text) => Self::InvalidDecimalFormat(text),
            other => Self::Decimal(other),
        }
    }
}

impl From<SourceError> for ReportError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::CorruptAmount(text) => Self::InvalidDecimalFormat(text),
            SourceError::Backend(message) => Self::Source(message),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let message = err.to_string();
        match err {
            ReportError::EmptySelection | ReportError::UnsupportedExportType(_) => {
                Self::Validation(message)
            }
            ReportError::TemplateNotFound(_) | ReportError::ReportNotFound(_) => {
                Self::NotFound(message)
            }
            ReportError::InvalidDecimalFormat(_) | ReportError::Decimal(_) => {
                Self::DataIntegrity(message)
            }
            ReportError::RenderServiceUnavailable(_) => Self::ServiceUnavailable(message),
            ReportError::RenderServiceError { .. } => Self::ExternalService(message),
            ReportError::Source(_) | ReportError::Storage(_) => Self::Internal(message),
        }
    }
}
