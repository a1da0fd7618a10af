//! Retry utilities with exponential backoff for upstream lookups.

use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

use crate::sources::SourceError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend on retries (including delays)
    pub max_total_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            max_total_time: Duration::from_secs(120),
        }
    }
}

impl RetryConfig {
    /// Default backoff with the given attempt count (at least one)
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.initial_delay;
        }
        let exp_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt as f64 - 1.0);
        Duration::from_secs_f64(exp_delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Rate limit exceeded (with optional retry-after seconds)
    RateLimit(Option<u64>),
    /// Server error (5xx)
    ServerError,
    /// Request timeout
    Timeout,
}

impl TransientError {
    /// Check if a SourceError represents a transient error
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::RateLimit(retry_after) => Some(TransientError::RateLimit(*retry_after)),
            SourceError::Network(msg) => {
                if msg.to_lowercase().contains("timed out") {
                    Some(TransientError::Timeout)
                } else {
                    Some(TransientError::Network)
                }
            }
            SourceError::Api(msg) => {
                let msg_lower = msg.to_lowercase();
                if msg_lower.contains("server error") || msg_lower.contains("unavailable") {
                    Some(TransientError::ServerError)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Get the recommended delay for this error
    pub fn recommended_delay(&self) -> Duration {
        match self {
            TransientError::RateLimit(Some(seconds)) => Duration::from_secs(*seconds + 1),
            TransientError::RateLimit(None) => Duration::from_secs(61),
            TransientError::ServerError => Duration::from_secs(2),
            TransientError::Timeout => Duration::from_secs(2),
            TransientError::Network => Duration::from_secs(2),
        }
    }
}

/// Execute an async operation, retrying transient failures.
///
/// Permanent errors are returned immediately. With `max_attempts == 1` the
/// operation runs exactly once.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let started = Instant::now();
    let mut operation = operation;

    loop {
        attempts += 1;

        // Each attempt only gets what is left of the overall budget
        let remaining = config.max_total_time.saturating_sub(started.elapsed());
        let error = match timeout(remaining, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::info!(
                        "Lookup succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => error,
            Err(_) => SourceError::Network("Operation timed out".to_string()),
        };

        let Some(transient) = TransientError::from_source_error(&error) else {
            return Err(error);
        };

        let delay = std::cmp::max(config.backoff(attempts), transient.recommended_delay());
        let total_elapsed = started.elapsed();

        if attempts >= config.max_attempts || total_elapsed + delay >= config.max_total_time {
            if attempts > 1 {
                tracing::warn!(
                    "Lookup failed after {} attempts (total elapsed: {:?}): {}",
                    attempts,
                    total_elapsed,
                    error
                );
            }
            return Err(error);
        }

        tracing::debug!(
            "Transient error on attempt {}: {:?}, retrying in {:?}",
            attempts,
            transient,
            delay
        );
        sleep(delay).await;
    }
}
