//! Retry mechanism with exponential backoff

use crate::config::RetryConfig;
use crate::utils::error::ConfigCenterError;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry mechanism with exponential backoff
///
/// Only errors for which [`ConfigCenterError::is_transient`] holds are retried;
/// everything else is returned on the first failure.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self::new(RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Execute a function with retry logic
    pub async fn call<F, Fut, R>(&self, operation: &str, mut f: F) -> Result<R, ConfigCenterError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<R, ConfigCenterError>>,
    {
        let mut attempt = 0;
        let mut delay = Duration::from_millis(self.config.base_delay_ms);

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", operation, attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    if !error.is_transient() || attempt >= self.max_attempts() {
                        if attempt > 1 {
                            warn!("{} failed after {} attempts: {}", operation, attempt, error);
                        }
                        return Err(error);
                    }

                    debug!(
                        "{} attempt {} failed: {}, retrying in {:?}",
                        operation, attempt, error, delay
                    );

                    let actual_delay = if self.config.jitter {
                        let jitter_factor = 0.1;
                        let jitter = delay.as_millis() as f64
                            * jitter_factor
                            * (rand::random::<f64>() - 0.5);
                        Duration::from_millis((delay.as_millis() as f64 + jitter).max(0.0) as u64)
                    } else {
                        delay
                    };

                    tokio::time::sleep(actual_delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.config.backoff_multiplier) as u64,
                        ),
                        Duration::from_millis(self.config.max_delay_ms),
                    );
                }
            }
        }
    }
}
