use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini API error: {0}")]
    Api(String),

    #[error("Gemini returned no text")]
    EmptyResponse,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Gemini base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
