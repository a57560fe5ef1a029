//! HTTP client for the Apify actor API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::ProfileScrapeInput;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/";

/// Client for Apify's synchronous actor runs.
///
/// Starts the configured actor, waits for it to finish and returns the items
/// of its default dataset in one request. The API token is sent as a bearer
/// header and never appears in URLs or error messages.
///
/// Transient errors (429, 5xx, network failures) are retried with
/// exponential backoff; see [`ApifyClient::with_retry_policy`].
pub struct ApifyClient {
    client: Client,
    api_token: String,
    endpoint: Url,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl ApifyClient {
    /// Creates a client for `actor` (e.g. `clockworks/tiktok-profile-scraper`)
    /// against the production Apify API. Retries are disabled until
    /// [`ApifyClient::with_retry_policy`] is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_token: &str,
        actor: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        Self::with_base_url(api_token, actor, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`ScraperError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_token: &str,
        actor: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_token: api_token.to_owned(),
            endpoint: Self::run_sync_url(base_url, actor)?,
            max_retries: 0,
            backoff_base_secs: 0,
        })
    }

    /// Enables retries: up to `max_retries` additional attempts, waiting
    /// `backoff_base_secs * 2^(n-1)` seconds before the n-th retry.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    /// Scrapes the latest `limit` videos of `identity` and returns the raw
    /// dataset items in the order the actor produced them.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Unauthorized`]: HTTP 401/403 (not retried).
    /// - [`ScraperError::NotFound`]: HTTP 404, usually an unknown actor.
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: body is not a JSON array.
    pub async fn fetch_profile_videos(
        &self,
        identity: &str,
        limit: u32,
    ) -> Result<Vec<Value>, ScraperError> {
        let input = ProfileScrapeInput::for_profile(identity, limit);

        tracing::info!(identity, limit, "starting Apify profile scrape");

        let items = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let input = &input;
            async move {
                let response = self
                    .client
                    .post(self.endpoint.clone())
                    .bearer_auth(&self.api_token)
                    .json(input)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(ScraperError::Unauthorized {
                        status: status.as_u16(),
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: self.endpoint.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<Vec<Value>>(&body).map_err(|e| ScraperError::Deserialize {
                    context: format!("dataset items for profile {}", input.profiles.join(",")),
                    source: e,
                })
            }
        })
        .await?;

        tracing::info!(identity, items = items.len(), "Apify scrape finished");
        Ok(items)
    }

    /// Builds `{base}/v2/acts/{owner}~{name}/run-sync-get-dataset-items`.
    ///
    /// The actor's `/` separator is replaced with `~` as the Apify API expects.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` is not a valid
    /// absolute URL.
    fn run_sync_url(base_url: &str, actor: &str) -> Result<Url, ScraperError> {
        let invalid = |reason: String| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;

        let actor_path = actor.trim().trim_matches('/').replace('/', "~");
        if actor_path.is_empty() {
            return Err(invalid("actor id is empty".to_owned()));
        }

        base.join(&format!("v2/acts/{actor_path}/run-sync-get-dataset-items"))
            .map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
