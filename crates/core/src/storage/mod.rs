//! Storage for rendered PDF reports using Apache OpenDAL.
//!
//! Reports are written once under a freshly minted [`ReportId`] and read back
//! by that ID. The backend is chosen by configuration:
//! - in-process memory (default)
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, MinIO
//! - local filesystem (development only)
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 Apache OpenDAL                  │
//! ├─────────────────────────────────────────────────┤
//! │ op.write("reports/{id}.pdf", bytes)             │
//! │ op.read("reports/{id}.pdf")                     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! [`ReportId`]: tally_shared::types::ReportId

mod config;
mod error;
mod store;

pub use config::StorageConfig;
pub use error::StorageError;
pub use store::{OpendalReportStore, ReportStore};
