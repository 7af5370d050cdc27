//! Fixed-interval retry loop driven by response status.

use log::{debug, warn};
use std::future::Future;
use tokio_util::sync::CancellationToken;

use super::HttpResponse;
use crate::config::RetryConfig;
use crate::error::{Error, Result, TransportError};

/// Statuses that trigger another attempt.
///
/// 408 Request Timeout, 500 Internal Server Error, 502 Bad Gateway,
/// 503 Service Unavailable, 504 Gateway Timeout.
pub const RETRYABLE_STATUSES: [u16; 5] = [408, 500, 502, 503, 504];

pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Runs one transport attempt at a time until the status leaves the
/// retryable set or the attempts are used up.
///
/// Transport errors end the loop immediately and are not retried. The final
/// response is returned as-is, whatever its status; interpreting it is up to
/// the caller.
#[derive(Debug, Clone, Copy)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> RetryConfig {
        self.config
    }

    /// Executes `operation` under the retry policy.
    ///
    /// Cancelling `cancel` aborts the in-flight attempt or the pending delay
    /// and yields [`Error::Cancelled`].
    pub async fn execute<F, Fut>(
        &self,
        operation_name: &str,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<HttpResponse>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<HttpResponse, TransportError>>,
    {
        let max_attempts = self.config.max_attempts();
        let interval = self.config.interval();
        let mut attempt = 1;

        loop {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("{}: cancelled during attempt {}/{}", operation_name, attempt, max_attempts);
                    return Err(Error::Cancelled);
                }
                result = operation() => match result {
                    Ok(response) => response,
                    Err(e) => {
                        debug!("{}: transport error on attempt {}/{}: {}", operation_name, attempt, max_attempts, e);
                        return Err(e.into());
                    }
                },
            };

            if !is_retryable_status(response.status) {
                debug!(
                    "{}: HTTP {} on attempt {}/{}, not retrying",
                    operation_name, response.status, attempt, max_attempts
                );
                return Ok(response);
            }

            if attempt >= max_attempts {
                warn!(
                    "{}: HTTP {} on final attempt {}/{}, giving up",
                    operation_name, response.status, attempt, max_attempts
                );
                return Ok(response);
            }

            warn!(
                "{}: attempt {}/{} returned HTTP {}, retrying in {}ms...",
                operation_name,
                attempt,
                max_attempts,
                response.status,
                interval.as_millis()
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("{}: cancelled while waiting to retry", operation_name);
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(interval) => {}
            }

            attempt += 1;
        }
    }
}
