//! HTTP client for Gemini's `generateContent` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Longest error body kept in [`ReportError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Gemini text-generation client.
///
/// The API key travels in the `x-goog-api-key` header, so it never appears
/// in request URLs or in `reqwest` error messages.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiClient {
    /// Creates a client for `model` against the public Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ReportError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ReportError::InvalidBaseUrl`] if the endpoint cannot be formed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint: Self::generate_url(base_url, model)?,
        })
    }

    /// Sends `prompt` as a single user turn and returns the concatenated text
    /// parts of the first candidate.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Http`]: network failure or timeout.
    /// - [`ReportError::Status`]: non-2xx response.
    /// - [`ReportError::Api`]: the prompt was blocked.
    /// - [`ReportError::Deserialize`]: the body is not a `generateContent`
    ///   response.
    /// - [`ReportError::EmptyResponse`]: no candidate carried any text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ReportError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        tracing::info!(
            endpoint = %self.endpoint,
            prompt_chars = prompt.chars().count(),
            "requesting report from Gemini"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ReportError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ReportError::Deserialize {
                context: "generateContent response".to_owned(),
                source: e,
            })?;

        extract_text(parsed)
    }

    /// Builds `{base}/v1beta/models/{model}:generateContent`.
    fn generate_url(base_url: &str, model: &str) -> Result<Url, ReportError> {
        let invalid = |reason: String| ReportError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;

        let model = model.trim().trim_start_matches("models/");
        if model.is_empty() {
            return Err(invalid("model name is empty".to_owned()));
        }

        base.join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|e| invalid(e.to_string()))
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, ReportError> {
    if response.candidates.is_empty() {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ReportError::Api(format!("prompt blocked: {reason}")));
        }
        return Err(ReportError::EmptyResponse);
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReportError::EmptyResponse);
    }
    Ok(text)
}

/// Prefers the API's `error.message`; falls back to the truncated raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}
