//! Request plumbing shared by the API clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use tracing::warn;

use super::ApiError;

/// HTTP request timeout in seconds. Generation can be slow.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum number of retries for rate-limited (429) requests.
pub(crate) const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
pub(crate) const INITIAL_BACKOFF_MS: u64 = 1000;

pub(crate) fn build_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}

/// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
/// or Err for other errors.
async fn check_response_for_retry(response: Response) -> Result<Option<Response>> {
    if response.status().is_success() {
        Ok(Some(response))
    } else if response.status().as_u16() == 429 {
        Ok(None)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body).into())
    }
}

/// Send a request, retrying 429s with exponential backoff.
///
/// `build` is called once per attempt since a sent request cannot be reused.
pub(crate) async fn send_with_backoff(
    what: &str,
    build: impl Fn() -> RequestBuilder,
) -> Result<Response> {
    let mut retries = 0;
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        let response = build()
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        match check_response_for_retry(response).await? {
            Some(response) => return Ok(response),
            None => {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited.into());
                }
                warn!(request = what, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
            }
        }
    }
}
