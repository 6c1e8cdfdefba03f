mod batch;
mod config;
mod errors;
mod layout;
mod models;
mod render;
mod state;
mod thumbnails;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::{load_records, run_batch, LOAD_FAILURE};
use crate::config::Config;
use crate::layout::default_page_geometry;
use crate::state::BatchState;
use crate::thumbnails::HttpThumbnailFetcher;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting movie-pdf v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = HttpThumbnailFetcher::new(Duration::from_secs(config.thumbnail_timeout_secs))?;
    let geometry = default_page_geometry();
    info!(
        "Page geometry: {}x{}pt, margin {}pt, line height {}pt",
        geometry.width, geometry.height, geometry.margin, geometry.line_height
    );

    let state = BatchState {
        config: config.clone(),
        fetcher: Arc::new(fetcher),
        geometry,
    };

    // Returned to the runtime, which prints the cause chain once.
    let records = load_records(&config.movies_file).context(LOAD_FAILURE)?;
    info!(count = records.len(), "Loaded movie records");

    let summary = run_batch(records, &state);
    info!(
        generated = summary.generated,
        failed = summary.failed,
        output = %config.output_dir.display(),
        "Movie PDFs generated successfully"
    );

    Ok(())
}
