//! HTTP retry helper for transient errors.
//!
//! The citydata endpoints rate-limit aggressively when dozens of per-area
//! requests land at once, so every request goes through [`send_text`]
//! instead of calling `reqwest::RequestBuilder::send()` directly:
//!
//! ```ignore
//! let body = retry::send_text(|| client.get(&url)).await?;
//! ```

use std::time::Duration;

use crate::SourceError;

/// Retry attempts for transient errors (timeouts, connection resets,
/// HTTP 429, HTTP 5xx). Backoff is 2s then 4s; an area whose endpoint is
/// down for longer than that is simply reported as failed for this cycle
/// and retried on the next one.
const MAX_RETRIES: u32 = 2;

/// Sends an HTTP request and returns the response body as a `String`.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// Retries transient connection errors, HTTP 429, and HTTP 5xx with
/// exponential backoff. Other 4xx statuses are permanent and fail
/// immediately.
///
/// # Errors
///
/// Returns [`SourceError`] if the request still fails after all retries,
/// the server answers with a non-retryable status, or the body cannot be
/// read as text.
#[allow(clippy::future_not_send)]
pub async fn send_text<F>(build_request: F) -> Result<String, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    for attempt in 0..=MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << attempt); // 2s, 4s
            log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(error) => {
                if is_transient(&error) && attempt < MAX_RETRIES {
                    log::warn!("  transient error: {error}");
                    continue;
                }
                return Err(SourceError::Http(error));
            }
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if attempt < MAX_RETRIES {
                        log::warn!("  HTTP {status}, retrying");
                        continue;
                    }
                    return Err(SourceError::Status { status });
                }

                if status.is_client_error() {
                    return Err(SourceError::Status { status });
                }

                return Ok(response.text().await?);
            }
        }
    }

    // Every final attempt returns above, both on success and on failure.
    unreachable!("send_text retry loop exited without returning")
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_body() || error.is_decode()
}
