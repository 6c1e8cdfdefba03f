use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MOVIES_FILE: &str = "data/movies.json";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_THUMBNAIL_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Every variable is optional; the defaults describe a plain run from the crate root.
#[derive(Debug, Clone)]
pub struct Config {
    pub movies_file: PathBuf,
    pub output_dir: PathBuf,
    pub thumbnail_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            movies_file: env_or("MOVIES_FILE", DEFAULT_MOVIES_FILE).into(),
            output_dir: env_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR).into(),
            thumbnail_timeout_secs: std::env::var("THUMBNAIL_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_THUMBNAIL_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .context("THUMBNAIL_TIMEOUT_SECS must be a whole number of seconds")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
