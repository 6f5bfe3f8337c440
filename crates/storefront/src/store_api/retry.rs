//! Retry with exponential back-off for store API calls.
//!
//! Search pages fan out five requests at once and a single transient failure
//! should not blank the page, so those calls go through [`retry_with_backoff`].

use std::future::Future;
use std::time::Duration;

use super::StoreApiError;

/// Attempt budget and base delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub attempts: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Delay after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }
}

/// Whether retrying `err` could succeed.
///
/// A missing entity stays missing and a 4xx will not change, everything else
/// (transport failures, 5xx, truncated bodies) is retried.
pub(crate) fn is_retriable(err: &StoreApiError) -> bool {
    match err {
        StoreApiError::NotFound(_) | StoreApiError::InvalidUrl(_) => false,
        StoreApiError::Status { status, .. } => status.is_server_error(),
        StoreApiError::Http(_) | StoreApiError::Parse(_) => true,
    }
}

/// Run `operation`, retrying transient failures per `policy`.
///
/// | Attempt | Sleep before it   |
/// |---------|-------------------|
/// | 1       | none              |
/// | 2       | `base_delay`      |
/// | 3       | `base_delay` × 2  |
///
/// The last error is returned once `policy.attempts` calls have failed.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, StoreApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreApiError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    attempts = policy.attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Store API call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
