use std::sync::Arc;

use crate::config::Config;
use crate::layout::PageGeometry;
use crate::thumbnails::ThumbnailFetcher;

/// Everything a record needs to be rendered, shared across the whole batch.
/// Holds no per-record state: each record builds its own document and cursor.
#[derive(Clone)]
pub struct BatchState {
    pub config: Config,
    /// Thumbnail source. Default: `HttpThumbnailFetcher`.
    pub fetcher: Arc<dyn ThumbnailFetcher>,
    pub geometry: PageGeometry,
}
