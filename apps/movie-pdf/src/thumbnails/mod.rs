//! Thumbnail fetching, the only network access in the batch.
//!
//! `BatchState` holds an `Arc<dyn ThumbnailFetcher>`; the binary wires in
//! `HttpThumbnailFetcher`, tests wire in canned bytes or failures.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

/// Failures scoped to one thumbnail. They never fail the record that owns it.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Thumbnail request returned status {status}")]
    Status { status: u16 },

    #[error("Thumbnail response was empty")]
    Empty,

    #[error("Thumbnail is not a URL string: {found}")]
    NotAUrl { found: String },

    #[error("Could not decode thumbnail: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Could not compress thumbnail: {0}")]
    Encode(#[from] std::io::Error),
}

/// Source of raw thumbnail bytes.
pub trait ThumbnailFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError>;
}

/// Blocking HTTP fetcher with a per-request timeout.
pub struct HttpThumbnailFetcher {
    client: Client,
}

impl HttpThumbnailFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ThumbnailError> {
        let client = Client::builder()
            .timeout(timeout)
            // Image hosts such as Wikimedia reject requests without a user agent.
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self { client })
    }
}

impl ThumbnailFetcher for HttpThumbnailFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError> {
        debug!(url, "Fetching thumbnail");
        let response = self.client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(ThumbnailError::Empty);
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_an_http_error() {
        let fetcher = HttpThumbnailFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(matches!(err, ThumbnailError::Http(_)), "got {err:?}");
    }

    #[test]
    fn test_status_error_message_names_status() {
        let err = ThumbnailError::Status { status: 404 };
        assert!(err.to_string().contains("404"));
    }
}
