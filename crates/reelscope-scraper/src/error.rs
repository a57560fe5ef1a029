use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by Apify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("Apify rejected the API token (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("actor or endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid Apify base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("cache I/O error at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
