//! Tally API Server
//!
//! Main entry point for the budget report service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_core::reports::{
    HttpPdfRenderer, InMemoryReportSource, RenderDispatcher, ReportService, ReportSnapshot,
};
use tally_core::storage::{OpendalReportStore, StorageConfig};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Load entity snapshot
    let source = match &config.data.snapshot_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            let snapshot = ReportSnapshot::from_json(&json)
                .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
            let source = InMemoryReportSource::from_snapshot(snapshot);
            info!(path = %path.display(), accounts = source.account_count(), "Loaded snapshot");
            source
        }
        None => {
            warn!("No snapshot configured; starting with empty data");
            InMemoryReportSource::new()
        }
    };

    // Create PDF renderer
    let renderer = HttpPdfRenderer::from_config(&config.renderer)?;
    if renderer.is_configured() {
        info!(timeout_secs = config.renderer.timeout_secs, "PDF rendering service configured");
    } else {
        warn!("No PDF rendering service configured; PDF export will fail");
    }
    let dispatcher = RenderDispatcher::new(Arc::new(renderer))
        .with_timeout(Duration::from_secs(config.renderer.timeout_secs));

    // Create report store
    let store = OpendalReportStore::from_config(StorageConfig::new(config.storage.provider.clone()))?;
    info!(provider = store.provider_name(), "Report storage configured");

    // Create application state
    let service = ReportService::new(Arc::new(source), dispatcher, Arc::new(store));
    let app = create_router(AppState::new(service));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
