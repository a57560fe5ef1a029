//! Retry with exponential backoff for transient Apify errors.
//!
//! A synchronous actor run can take minutes and occasionally hits platform
//! throttling or gateway errors. Those are retried; auth, not-found and
//! malformed-body errors are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Returns `true` if `err` is worth retrying after a backoff delay.
///
/// Retriable:
/// - [`ScraperError::RateLimited`]: HTTP 429.
/// - [`ScraperError::Http`]: connection reset, timeout and similar.
/// - [`ScraperError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else (401/403, 404, other 4xx, bad JSON, cache I/O) is final.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient failures.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds. With `max_retries = 3` the operation runs at most 4 times; the
/// last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient Apify error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error(status: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status,
            url: "https://api.apify.com/v2/acts/x/run-sync-get-dataset-items".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(ScraperError::RateLimited {
                        retry_after_secs: 0,
                    })
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_server_errors_until_exhausted() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(2, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error(502))
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error(400))
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn does_not_retry_unauthorized() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::Unauthorized { status: 401 })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, ScraperError>(ScraperError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
    }
}
