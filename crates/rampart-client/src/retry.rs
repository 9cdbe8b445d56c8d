//! Retry decorator: bounded exponential backoff with jitter.
//!
//! The retry loop is exactly that - a loop. Each attempt awaits the inner
//! adapter, and the inter-attempt delay is a `tokio::time::sleep`, so no OS
//! thread parks, no future chain grows with the attempt count, and dropping
//! the task cancels both the in-flight request and the pending timer.
//!
//! A failure is re-dispatched only when every gate holds:
//!
//! 1. the result is a `Failure`,
//! 2. its category is retryable (`NetworkError` or `ServerError`),
//! 3. attempts remain,
//! 4. the method is idempotent, when `idempotent_only` is set.
//!
//! The cache decorator sits *below* this layer, so `304 Not Modified` has
//! already been translated into a `Success` by the time the gate runs - a
//! 304 never burns a retry attempt.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use async_trait::async_trait;

use crate::adapter::{AdapterRequest, HttpAdapter};
use crate::result::HttpResult;

/// Backoff policy. Immutable; validated by the builder methods.
///
/// The delay before attempt `n + 1` is
/// `min(initial_delay * multiplier^(n-1) * (1 + U * jitter), max_delay)`
/// with `U` uniform in `[-1, 1]`, drawn from the thread-local generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempt budget, including the first. At least 1.
    pub max_attempts: u32,

    /// Delay after the first failed attempt.
    pub initial_delay: Duration,

    /// Exponential growth factor, at least 1.0.
    pub multiplier: f64,

    /// Upper bound on any single delay.
    pub max_delay: Duration,

    /// Jitter fraction in `[0, 1]`; 0 disables jitter.
    pub jitter: f64,

    /// When set, only idempotent methods are retried.
    pub idempotent_only: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: 0.1,
            idempotent_only: true,
        }
    }
}

impl RetryConfig {
    /// Set the attempt budget. Clamped to at least 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the first inter-attempt delay.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the growth factor. Clamped to at least 1.0.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier.max(1.0);
        self
    }

    /// Set the delay ceiling.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the jitter fraction. Clamped into `[0, 1]`.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Restrict retries to idempotent methods.
    pub fn with_idempotent_only(mut self, idempotent_only: bool) -> Self {
        self.idempotent_only = idempotent_only;
        self
    }
}

/// Retry decorator wrapping any inner adapter.
pub struct RetryingAdapter<A> {
    inner: A,
    config: RetryConfig,
}

impl<A> RetryingAdapter<A> {
    pub fn new(inner: A, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The randomized, capped delay scheduled between attempt `attempt` and
    /// the next one (`attempt` is 1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let base = self.config.initial_delay.as_secs_f64() * self.config.multiplier.powi(exponent);
        // Uniform in [-1, 1] from the thread-local generator; no shared
        // RNG state across tasks.
        let unit = rand::random::<f64>() * 2.0 - 1.0;
        let randomized = base * (1.0 + unit * self.config.jitter);
        let capped = randomized
            .min(self.config.max_delay.as_secs_f64())
            .max(0.0);
        Duration::from_secs_f64(capped)
    }

    fn gate_allows<T>(&self, result: &HttpResult<T>, request: &AdapterRequest, attempt: u32) -> bool {
        if !result.is_retryable() {
            return false;
        }
        if attempt >= self.config.max_attempts {
            return false;
        }
        if self.config.idempotent_only && !request.method.is_idempotent() {
            return false;
        }
        true
    }
}

#[async_trait]
impl<T, A> HttpAdapter<T> for RetryingAdapter<A>
where
    T: Send + Sync + 'static,
    A: HttpAdapter<T>,
{
    fn uri(&self) -> &str {
        self.inner.uri()
    }

    async fn dispatch(&self, request: AdapterRequest) -> HttpResult<T> {
        let mut attempt: u32 = 1;
        loop {
            let result = self.inner.dispatch(request.clone()).await;

            if result.is_success() {
                if attempt > 1 {
                    debug!(uri = %self.inner.uri(), attempt, "request recovered after retry");
                }
                return result;
            }
            if !self.gate_allows(&result, &request, attempt) {
                return result;
            }

            let delay = self.delay_for_attempt(attempt);
            warn!(
                uri = %self.inner.uri(),
                method = %request.method,
                attempt,
                max_attempts = self.config.max_attempts,
                delay_ms = delay.as_millis() as u64,
                category = ?result.error_category(),
                "retrying after failure"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
