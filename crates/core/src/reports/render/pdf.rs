//! PDF rendering through an external HTML-to-PDF service.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tally_shared::config::RendererConfig;
use tracing::{debug, error};

use crate::reports::error::ReportError;

/// Longest service error body carried into [`ReportError::RenderServiceError`].
const MAX_ERROR_BODY: usize = 512;

/// Turns an HTML document into PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    /// Renders `html` to PDF.
    async fn render(&self, html: &str) -> Result<Bytes, ReportError>;
}

/// [`PdfRenderer`] that POSTs HTML to `{base_url}/pdf`.
#[derive(Debug, Clone)]
pub struct HttpPdfRenderer {
    client: Client,
    base_url: Option<String>,
}

impl HttpPdfRenderer {
    /// Creates a renderer for `base_url`; `None` leaves PDF export unavailable.
    ///
    /// The service is addressed directly, never through a system proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).no_proxy().build()?;
        let base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Ok(Self { client, base_url })
    }

    /// Creates a renderer from the `renderer` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &RendererConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Whether a service address is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

#[async_trait]
impl PdfRenderer for HttpPdfRenderer {
    async fn render(&self, html: &str) -> Result<Bytes, ReportError> {
        let Some(base_url) = &self.base_url else {
            return Err(ReportError::RenderServiceUnavailable(
                "no rendering service configured".to_string(),
            ));
        };
        let url = format!("{base_url}/pdf");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_string())
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Rendering service unreachable");
                ReportError::RenderServiceUnavailable(describe(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY).collect()
            };
            error!(url = %url, status = status.as_u16(), "Rendering service rejected document");
            return Err(ReportError::RenderServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReportError::RenderServiceUnavailable(describe(&e)))?;
        debug!(size = bytes.len(), "Rendered PDF");
        Ok(bytes)
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "rendering service timed out".to_string()
    } else if err.is_connect() {
        format!("cannot connect to rendering service: {err}")
    } else {
        err.to_string()
    }
}
