// src/error_recovery.rs
//! Retry with exponential backoff for API operations.

use crate::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_RETRY_DELAY, DEFAULT_MAX_RETRIES,
    DEFAULT_MAX_RETRY_DELAY,
};
use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff parameters.
///
/// `max_retries` counts total attempts, so `1` means "try once".
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_RETRY_DELAY,
            max_delay: DEFAULT_MAX_RETRY_DELAY,
            factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, max_delay: Duration, factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            factor,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_retries < 1 {
            return Err(AppError::InvalidRetryPolicy(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.initial_delay.is_zero() {
            return Err(AppError::InvalidRetryPolicy(
                "initial_delay must be greater than zero".to_string(),
            ));
        }
        if !self.factor.is_finite() || self.factor <= 1.0 {
            return Err(AppError::InvalidRetryPolicy(format!(
                "factor must be a finite number greater than 1, got {}",
                self.factor
            )));
        }
        Ok(())
    }

    /// The waits between consecutive attempts, `max_retries - 1` entries.
    pub fn delays(&self) -> Vec<Duration> {
        let mut current = self.initial_delay;
        (1..self.max_retries)
            .map(|_| {
                let wait = current.min(self.max_delay);
                current = self.grow(current);
                wait
            })
            .collect()
    }

    fn grow(&self, current: Duration) -> Duration {
        // Saturates at max_delay instead of overflowing Duration.
        Duration::try_from_secs_f64(current.as_secs_f64() * self.factor)
            .map(|next| next.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

/// Retries `operation` with the default classification from [`AppError::is_retriable`].
pub async fn with_retry<F, T, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    with_retry_if(policy, AppError::is_retriable, operation).await
}

/// Retries `operation` while `retry_on` accepts the error.
///
/// The policy is validated before the first attempt. A rejected error is
/// returned immediately; once attempts are exhausted the last error is.
pub async fn with_retry_if<F, T, Fut, P>(
    policy: &RetryPolicy,
    retry_on: P,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
    P: Fn(&AppError) -> bool,
{
    policy.validate()?;

    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !retry_on(&e) || attempt >= policy.max_retries {
                    if attempt > 1 {
                        log::warn!("Giving up after {} attempt(s): {}", attempt, e);
                    }
                    return Err(e);
                }

                let wait = delay.min(policy.max_delay);
                log::warn!(
                    "Attempt {}/{} failed ({}), retrying after {:?}",
                    attempt,
                    policy.max_retries,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;

                delay = policy.grow(delay);
                attempt += 1;
            }
        }
    }
}
