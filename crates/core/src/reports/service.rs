//! Report generation service.

use std::sync::Arc;

use bytes::Bytes;
use tally_shared::types::ReportId;
use tracing::{info, instrument, warn};

use super::aggregator::ValueAggregator;
use super::document::ReportAssembler;
use super::error::ReportError;
use super::render::RenderDispatcher;
use super::selection::SelectionResolver;
use super::source::ReportSource;
use super::types::{ExportType, GeneratedReport, RenderedReport, ReportRequest};
use crate::storage::ReportStore;

/// Runs the report pipeline: select, aggregate, assemble, render, store.
#[derive(Clone)]
pub struct ReportService {
    source: Arc<dyn ReportSource>,
    dispatcher: RenderDispatcher,
    store: Arc<dyn ReportStore>,
}

impl ReportService {
    /// Creates a service over the given source, renderer and store.
    #[must_use]
    pub fn new(
        source: Arc<dyn ReportSource>,
        dispatcher: RenderDispatcher,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        Self {
            source,
            dispatcher,
            store,
        }
    }

    /// Generates one report.
    ///
    /// The export type is checked before anything is looked up. Pairs whose
    /// budget or account no longer exists are skipped, not fatal. A PDF is
    /// stored and its new ID returned alongside the bytes.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported export type, an empty selection, an unknown
    /// template, corrupt stored amounts, and rendering or storage failures.
    #[instrument(skip_all, fields(template_id = %request.template_id))]
    pub async fn generate_report(
        &self,
        request: &ReportRequest,
    ) -> Result<GeneratedReport, ReportError> {
        let export_type: ExportType = request.export_type.parse()?;
        let pairs = SelectionResolver::resolve(&request.budget_ids, &request.account_ids)?;

        let template = self
            .source
            .find_template(request.template_id)
            .await?
            .ok_or(ReportError::TemplateNotFound(request.template_id))?;

        let values = ValueAggregator::new(self.source.as_ref())
            .aggregate(&pairs)
            .await?;
        let document = ReportAssembler::assemble(&template, request.visibility, &values)?;
        if !document.skipped.is_empty() {
            warn!(skipped = document.skipped.len(), "Report generated with skipped rows");
        }

        let generated = match self.dispatcher.dispatch(&document, export_type).await? {
            RenderedReport::Html(html) => GeneratedReport::Html(html),
            RenderedReport::Pdf(bytes) => {
                let report_id = self.store.write(bytes.clone()).await?;
                GeneratedReport::Pdf { report_id, bytes }
            }
        };

        info!(
            %export_type,
            pairs = pairs.len(),
            rows = document.row_count(),
            sections = document.sections.len(),
            "Generated report"
        );
        Ok(generated)
    }

    /// Reads a previously generated PDF.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::ReportNotFound`] for an unknown ID.
    pub async fn fetch_report(&self, id: ReportId) -> Result<Bytes, ReportError> {
        self.store
            .read(id)
            .await?
            .ok_or(ReportError::ReportNotFound(id))
    }
}
