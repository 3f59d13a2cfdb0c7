use crate::api::{Error, Result};
use crate::diagnostics::Diagnostics;
use chrono::{DateTime, Utc};
use log::Level;
use std::future::Future;
use std::time::Duration;

/// Shortest wait after hitting the primary rate limit.
pub const RATE_LIMIT_FLOOR: Duration = Duration::from_secs(5);
/// Shortest wait after hitting the secondary (abuse) rate limit.
pub const SECONDARY_RATE_LIMIT_FLOOR: Duration = Duration::from_secs(10);

/// Repeats an upstream call until it stops reporting transient failures.
///
/// There is no attempt limit: the run is a one-shot batch job and can be aborted by dropping
/// its future.
pub struct RetryingFetcher<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> RetryingFetcher<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        RetryingFetcher { diagnostics }
    }

    pub fn diagnostics(&self) -> &'a dyn Diagnostics {
        self.diagnostics
    }

    /// Runs `call` until it succeeds or fails terminally. Terminal errors are wrapped with
    /// `operation`.
    pub async fn fetch<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(Error::RateLimited { reset }) => {
                    let delay = wait_until(reset, Utc::now(), RATE_LIMIT_FLOOR);
                    self.emit_wait(operation, "hit rate limit", delay);
                    tokio::time::sleep(delay).await;
                }
                Err(Error::SecondaryRateLimited { retry_after }) => {
                    let delay = wait_until(retry_after, Utc::now(), SECONDARY_RATE_LIMIT_FLOOR);
                    self.emit_wait(operation, "hit secondary rate limit", delay);
                    tokio::time::sleep(delay).await;
                }
                Err(Error::NotReady) => {
                    self.diagnostics
                        .emit(Level::Debug, &format!("{}: not ready yet, retrying", operation));
                }
                Err(err) => return Err(err.context(operation)),
            }
        }
    }

    fn emit_wait(&self, operation: &str, reason: &str, delay: Duration) {
        self.diagnostics.emit(
            Level::Warn,
            &format!("{}: {}, waiting {} sec", operation, reason, delay.as_secs()),
        );
    }
}

/// `max(until - now, floor)`.
fn wait_until(until: DateTime<Utc>, now: DateTime<Utc>, floor: Duration) -> Duration {
    (until - now)
        .to_std()
        .map(|remaining| remaining.max(floor))
        .unwrap_or(floor)
}
