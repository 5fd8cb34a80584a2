//! Dispatch of a report document to the requested output format.

mod html;
mod pdf;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

pub use html::HtmlRenderer;
pub use pdf::{HttpPdfRenderer, PdfRenderer};

use super::document::ReportDocument;
use super::error::ReportError;
use super::types::{ExportType, RenderedReport};

/// Routes a document to the HTML renderer or the PDF service.
#[derive(Clone)]
pub struct RenderDispatcher {
    pdf: Arc<dyn PdfRenderer>,
    timeout: Duration,
}

impl RenderDispatcher {
    /// Default bound on a PDF render call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a dispatcher using `pdf` for PDF output.
    #[must_use]
    pub fn new(pdf: Arc<dyn PdfRenderer>) -> Self {
        Self {
            pdf,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the upper bound for a PDF render call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Renders `document` as `export_type`.
    ///
    /// HTML is produced locally. PDF renders the same HTML and hands it to the
    /// PDF service; a call that exceeds the timeout fails as unavailable.
    pub async fn dispatch(
        &self,
        document: &ReportDocument,
        export_type: ExportType,
    ) -> Result<RenderedReport, ReportError> {
        let html = HtmlRenderer::render(document);
        debug!(%export_type, html_len = html.len(), "Rendering report");

        match export_type {
            ExportType::Html => Ok(RenderedReport::Html(html)),
            ExportType::Pdf => {
                let bytes = timeout(self.timeout, self.pdf.render(&html))
                    .await
                    .map_err(|_| {
                        ReportError::RenderServiceUnavailable(
                            "rendering service timed out".to_string(),
                        )
                    })??;
                Ok(RenderedReport::Pdf(bytes))
            }
        }
    }
}
