//! Shared HTTP transport for the LLM backends
//!
//! Posts a JSON body and retries transient failures with exponential backoff.
//! Rate limiting is surfaced immediately with the server's retry-after hint.

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Retry-after used when a 429 carries no usable header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504)
}

/// Backoff before the given retry attempt (1-based)
pub(crate) fn backoff_for(attempt: u32) -> Duration {
    Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt.saturating_sub(1)))
}

/// Build a reqwest client with the request timeout applied
pub(crate) fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder().timeout(timeout).build().map_err(LlmError::Network)
}

/// POST `body` to `url`, returning the first successful response
///
/// Transient failures are retried up to [`MAX_RETRIES`] times; anything else,
/// including a 429, is returned immediately.
pub(crate) async fn post_json(
    http: &Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<Response, LlmError> {
    debug!(%url, has_bearer = bearer.is_some(), "post_json: called");

    let mut attempt = 0;
    loop {
        let err = match send_once(http, url, bearer, body, timeout).await {
            Ok(response) => {
                debug!(attempt, "post_json: success");
                return Ok(response);
            }
            Err(e) => e,
        };

        if !err.is_transient() || attempt >= MAX_RETRIES {
            debug!(attempt, error = %err, "post_json: giving up");
            return Err(err);
        }

        attempt += 1;
        let backoff = backoff_for(attempt);
        warn!(
            attempt,
            backoff_ms = backoff.as_millis() as u64,
            error = %err,
            "post_json: retrying after transient error"
        );
        tokio::time::sleep(backoff).await;
    }
}

/// One request, with the status mapped onto [`LlmError`]
async fn send_once(
    http: &Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<Response, LlmError> {
    let mut builder = http.post(url).header("content-type", "application/json").json(body);
    if let Some(key) = bearer {
        builder = builder.header("Authorization", format!("Bearer {}", key));
    }

    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(e)
        }
    })?;

    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        debug!(retry_after, "send_once: rate limited");
        return Err(LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after),
        });
    }

    if !response.status().is_success() {
        let message = response.text().await.unwrap_or_default();
        debug!(status, "send_once: API error");
        return Err(LlmError::ApiError { status, message });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(408));
        assert!(!is_retryable_status(429));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(200));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_for(1), Duration::from_millis(1000));
        assert_eq!(backoff_for(2), Duration::from_millis(2000));
        assert_eq!(backoff_for(3), Duration::from_millis(4000));
    }
}
