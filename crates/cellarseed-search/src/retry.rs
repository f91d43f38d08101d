//! Retry with exponential back-off and jitter for the search client.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries on
//! transient conditions only: rate limiting (429), 5xx statuses, and
//! network-level timeout/connect failures. API-level error payloads and
//! other non-2xx statuses are returned immediately; retrying a logical
//! error is futile.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Returns `true` for errors worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::RetryableStatus { .. } => true,
        SearchError::Http(e) => e.is_timeout() || e.is_connect(),
        SearchError::UnexpectedStatus { .. }
        | SearchError::ApiError(_)
        | SearchError::Deserialize { .. }
        | SearchError::InvalidEndpoint { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The wait before the n-th retry is `backoff_base_ms * 2^(n-1)` plus up to
/// 250 ms of uniform jitter, capped at 60 s. Non-retriable errors and retry
/// exhaustion return the last error to the caller.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    const JITTER_MS: u64 = 250;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let jitter = (rand::random::<f64>() * JITTER_MS as f64) as u64;
                let delay_ms = computed.min(MAX_DELAY_MS).saturating_add(jitter);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient search API error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
