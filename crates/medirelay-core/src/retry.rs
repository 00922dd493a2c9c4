//! Bounded retry for transient upstream failures.
//!
//! Wraps completion and storage calls in exponential backoff with jitter.
//! Retryable outcomes (transport errors, timeouts, 429, 5xx) are retried
//! until the time budget runs out; non-retryable outcomes (4xx, auth,
//! malformed bodies) surface immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;

use medirelay_types::error::StorageError;
use medirelay_types::llm::CompletionError;

/// Errors that can say whether retrying could plausibly succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for CompletionError {
    fn is_transient(&self) -> bool {
        CompletionError::is_transient(self)
    }
}

impl Transient for StorageError {
    fn is_transient(&self) -> bool {
        StorageError::is_transient(self)
    }
}

/// First backoff interval; subsequent intervals grow exponentially with
/// randomized jitter (the `backoff` crate's default randomization).
const INITIAL_INTERVAL: Duration = Duration::from_millis(100);

/// Run `op`, retrying transient failures with exponential backoff and
/// jitter until `max_elapsed` is spent. The last error is returned when
/// the budget runs out; non-transient errors are returned immediately.
pub async fn retry_transient<T, E, Op, Fut>(max_elapsed: Duration, mut op: Op) -> Result<T, E>
where
    E: Transient + Display,
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(INITIAL_INTERVAL)
        .with_max_elapsed_time(Some(max_elapsed))
        .build();

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => match policy.next_backoff() {
                Some(delay) => {
                    tracing::warn!(
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "transient upstream failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::warn!(error = %err, "retry budget exhausted");
                    return Err(err);
                }
            },
            Err(err) => return Err(err),
        }
    }
}
