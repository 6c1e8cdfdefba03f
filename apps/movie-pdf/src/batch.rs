//! Input loading and the per-record loop.
//!
//! The movie file is parsed as a JSON array of arbitrary values; failing that is
//! fatal. Each element is then validated and rendered on its own, and a failure
//! there is logged against that record without touching the rest of the batch.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::MovieRecord;
use crate::render::{render_movie, SheetReport};
use crate::state::BatchState;

/// Context attached to a fatal input failure.
pub const LOAD_FAILURE: &str = "Could not read the movie file, no PDFs were generated";

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub generated: usize,
    pub failed: usize,
}

/// Reads the movie file. Any error here leaves nothing to render.
pub fn load_records(path: &Path) -> Result<Vec<Value>, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::ParseInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders every record, isolating failures per record.
pub fn run_batch(records: Vec<Value>, state: &BatchState) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (index, value) in records.into_iter().enumerate() {
        let label = record_label(&value, index);
        match process_record(index, value, state) {
            Ok(report) => {
                info!(
                    title = %label,
                    pages = report.pages,
                    image = %report.image,
                    path = %report.path.display(),
                    "PDF generated for movie"
                );
                summary.generated += 1;
            }
            Err(e) => {
                error!(title = %label, error = %e, "Failed to generate PDF for movie");
                summary.failed += 1;
            }
        }
    }

    summary
}

fn process_record(index: usize, value: Value, state: &BatchState) -> Result<SheetReport, AppError> {
    let record = MovieRecord::from_value(index, value)?;
    render_movie(&record, state)
}

/// Names a record in diagnostics: its title when it has one, else its position.
fn record_label(value: &Value, index: usize) -> String {
    value
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map_or_else(|| format!("record #{index}"), str::to_string)
}
