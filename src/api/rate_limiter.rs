// src/api/rate_limiter.rs
//! Sliding-window rate limiting for outbound document API calls.
//!
//! The limiter keeps the start times of recent requests in a ledger. A caller
//! that finds the trailing one-second window full sleeps until the oldest
//! entry leaves it. Operations that come back rate limited are retried with
//! exponential backoff, re-entering the limiter on every attempt.

use crate::constants::{
    DEFAULT_INITIAL_RETRY_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY, RATE_LIMIT_WINDOW,
};
use crate::error::AppError;
use crate::error_recovery::{with_retry_if, RetryPolicy};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Caps requests per trailing one-second window. Share it behind an `Arc`.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests_per_second: u32,
    window: Duration,
    ledger: Mutex<VecDeque<Instant>>,
    backoff: RetryPolicy,
}

impl RateLimiter {
    pub fn new(max_requests_per_second: u32) -> Result<Self, AppError> {
        if max_requests_per_second == 0 {
            return Err(AppError::Validation(
                "requests per second must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_requests_per_second,
            window: RATE_LIMIT_WINDOW,
            ledger: Mutex::new(VecDeque::with_capacity(max_requests_per_second as usize)),
            backoff: RetryPolicy::new(
                DEFAULT_MAX_RETRIES,
                DEFAULT_INITIAL_RETRY_DELAY,
                DEFAULT_MAX_RETRY_DELAY,
                2.0,
            ),
        })
    }

    /// Overrides how rate-limited operations are retried.
    ///
    /// The n-th retry waits `initial_backoff * 2^n`.
    pub fn with_backoff(mut self, max_retries: u32, initial_backoff: Duration) -> Self {
        self.backoff = RetryPolicy::new(max_retries, initial_backoff, DEFAULT_MAX_RETRY_DELAY, 2.0);
        self
    }

    pub fn max_requests_per_second(&self) -> u32 {
        self.max_requests_per_second
    }

    /// Waits until the window admits one more request, then records it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut ledger = self.ledger.lock();
                let now = Instant::now();
                Self::prune(&mut ledger, now, self.window);

                if ledger.len() < self.max_requests_per_second as usize {
                    ledger.push_back(now);
                    return;
                }

                ledger
                    .front()
                    .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
                    .unwrap_or_default()
            };

            log::trace!("Rate limit window full, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Runs `operation` once the window admits it.
    ///
    /// Rate-limit failures are retried per the backoff policy; any other
    /// error is returned as is.
    pub async fn execute<F, T, Fut>(&self, mut operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        with_retry_if(&self.backoff, AppError::is_rate_limited, || {
            let call = operation();
            async move {
                self.acquire().await;
                call.await
            }
        })
        .await
    }

    /// Requests recorded inside the current window.
    pub fn current_request_count(&self) -> usize {
        let mut ledger = self.ledger.lock();
        Self::prune(&mut ledger, Instant::now(), self.window);
        ledger.len()
    }

    fn prune(ledger: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = ledger.front() {
            if now.saturating_duration_since(*oldest) >= window {
                ledger.pop_front();
            } else {
                break;
            }
        }
    }
}
