//! Strategic report generation for reelscope.
//!
//! Turns a [`reelscope_metrics::ReportRequest`] into an instruction prompt and
//! sends it to Gemini's `generateContent` endpoint. A failed generation never
//! affects the computed metrics; [`generate_report`] folds any error into a
//! message string shown in place of the report.

pub mod client;
pub mod error;
pub mod prompt;

pub use client::GeminiClient;
pub use error::ReportError;
pub use prompt::build_prompt;

use reelscope_metrics::ReportRequest;

/// Builds the prompt for `request` and returns the generated report text.
///
/// On failure the error is logged and a short description is returned
/// instead, so callers always have something to display.
pub async fn generate_report(client: &GeminiClient, request: &ReportRequest) -> String {
    let prompt = build_prompt(request);
    match client.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(username = %request.username, error = %e, "report generation failed");
            format!("report generation failed: {e}")
        }
    }
}
