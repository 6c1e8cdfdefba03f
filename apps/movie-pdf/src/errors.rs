use std::path::PathBuf;

use thiserror::Error;

/// Run-level and record-level failures.
///
/// `ReadInput` and `ParseInput` abort the whole run. Every other variant is scoped
/// to one movie record: the batch loop logs it and moves on to the next record.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read movie file {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Movie file {} is not a JSON array of records: {source}", .path.display())]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record #{index} does not match the movie schema: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record #{index} has no title")]
    MissingTitle { index: usize },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_names_the_file() {
        let err = AppError::ReadInput {
            path: PathBuf::from("data/movies.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("data/movies.json"));
    }

    #[test]
    fn test_record_errors_name_the_record() {
        assert_eq!(
            AppError::MissingTitle { index: 3 }.to_string(),
            "Record #3 has no title"
        );
        let io = AppError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert!(matches!(io, AppError::Io(_)));
    }
}
