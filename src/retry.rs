//! Bounded retry helper
//!
//! Re-runs an operation a bounded number of times with backoff, but only
//! while the error classifies as retryable. Core balance mutations are never
//! routed through this: a failed mutation must not be silently re-attempted,
//! and never with a different reference. This helper is for
//! derived side effects such as wallet provisioning and rail lookups.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::WalletError;

/// Distinguishes transient failures (worth another attempt) from terminal
/// rejections (never re-attempted).
pub trait RetryClass {
    fn is_retryable(&self) -> bool;
}

impl RetryClass for WalletError {
    fn is_retryable(&self) -> bool {
        WalletError::is_retryable(self)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping `backoff * attempt`
/// between tries, while errors are retryable. The last error is returned
/// unchanged once attempts are exhausted or the error is terminal.
pub async fn retry_bounded<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: RetryClass + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                warn!(attempt, error = %e, "retryable failure, backing off");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
