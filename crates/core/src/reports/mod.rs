//! Budget report generation.
//!
//! A request selects budgets and accounts; the pipeline pairs them up,
//! computes actual, target and difference values per pair, lays the values
//! out as a [`ReportDocument`] and renders it as HTML or PDF:
//!
//! ```text
//! ReportRequest ─► SelectionResolver ─► ValueAggregator ─► ReportAssembler ─► RenderDispatcher
//!                                          ▲                                      │
//!                                     ReportSource                     HtmlRenderer / PdfRenderer
//! ```

pub mod aggregator;
pub mod document;
pub mod error;
pub mod memory;
pub mod render;
pub mod selection;
pub mod service;
pub mod source;
pub mod types;


pub use aggregator::{AggregatedValues, ValueAggregator};
pub use document::{DocumentRow, ReportAssembler, ReportDocument, ReportSection, ValueField};
pub use error::ReportError;
pub use memory::{InMemoryReportSource, Posting, ReportSnapshot};
pub use render::{HtmlRenderer, HttpPdfRenderer, PdfRenderer, RenderDispatcher};
pub use selection::SelectionResolver;
pub use service::ReportService;
pub use source::{ReportSource, SourceError};
pub use types::*;
