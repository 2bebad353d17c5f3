//! Retry-until-successful driver.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use super::{LinearBackoff, StillPending};

/// Drives an operation until it succeeds or a wall-clock deadline elapses.
///
/// Between attempts the driver sleeps according to its backoff schedule.
/// Every failure raised by the operation is treated as recoverable and
/// retried; the driver does not classify errors. When the deadline is
/// exhausted it returns a single composite [`RetryExhausted`] embedding the
/// last attempt's error.
///
/// The deadline is checked before each attempt and before each sleep, never
/// mid-attempt: an attempt already in flight runs to completion, so the
/// overrun past the deadline is bounded by one attempt's own duration. The
/// driver also never starts a sleep that could not be followed by another
/// attempt inside the deadline.
///
/// Without a timeout, an operation that never succeeds retries forever;
/// bounding is then the caller's responsibility.
///
/// # Examples
///
/// ```rust
/// use ctrlplane_core::retry::Retry;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let retry = Retry::fixed(Duration::from_secs(30))
///     .timeout(Duration::from_secs(3600))
///     .verbose(true);
///
/// let value = retry
///     .call("fetch_value", || async {
///         Ok::<_, std::io::Error>(42)
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Retry {
    backoff: LinearBackoff,
    timeout: Option<Duration>,
    verbose: bool,
}

impl Retry {
    /// Retry on a constant interval.
    pub fn fixed(interval: Duration) -> Self {
        Self::with_backoff(LinearBackoff::fixed(interval))
    }

    /// Retry on an arbitrary backoff schedule.
    pub fn with_backoff(backoff: impl Into<LinearBackoff>) -> Self {
        Self {
            backoff: backoff.into(),
            timeout: None,
            verbose: false,
        }
    }

    /// Bound the whole retry session by a wall-clock deadline.
    ///
    /// Unset by default, meaning the driver retries until success.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Log every failed attempt at debug level.
    ///
    /// Off by default; exhaustion is always logged at warn level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run `op` until it succeeds or the deadline elapses.
    ///
    /// `operation` names the work in logs and in the composite failure. On
    /// success the result is returned immediately, with no trailing sleep.
    pub async fn call<F, Fut, T, E>(&self, operation: &str, mut op: F) -> Result<T, RetryExhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + Send + Sync + 'static,
    {
        let start = Instant::now();
        let mut backoff = self.backoff.clone();
        let mut last_error: Option<E> = None;

        while self.timeout.is_none_or(|timeout| start.elapsed() < timeout) {
            let next_interval = backoff.next_interval();

            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if self.verbose {
                        if let Some(pending) = find_pending(&err) {
                            tracing::debug!(
                                operation,
                                next_try_in = ?next_interval,
                                context = ?pending.fields(),
                                "{err}",
                            );
                        } else {
                            tracing::debug!(operation, next_try_in = ?next_interval, "{err}");
                        }
                    }
                    last_error = Some(err);

                    // Sleep only when another attempt still fits inside the
                    // deadline; an unconditional sleep could overshoot it.
                    match self.timeout {
                        Some(timeout) if start.elapsed() + next_interval >= timeout => break,
                        _ => tokio::time::sleep(next_interval).await,
                    }
                }
            }
        }

        tracing::warn!(
            operation,
            timeout = ?self.timeout,
            last_error = last_error.as_ref().map(tracing::field::display),
            "operation did not complete on time",
        );
        Err(RetryExhausted {
            operation: operation.to_string(),
            timeout: self.timeout,
            source: last_error.map(|err| Box::new(err) as Box<dyn StdError + Send + Sync>),
        })
    }

    /// [`call`](Self::call) for synchronous operations.
    ///
    /// The closure is wrapped in an already-complete future and fed through
    /// the same loop, so outcomes match the asynchronous path exactly.
    pub async fn call_sync<F, T, E>(&self, operation: &str, mut op: F) -> Result<T, RetryExhausted>
    where
        F: FnMut() -> Result<T, E>,
        E: StdError + Send + Sync + 'static,
    {
        self.call(operation, || std::future::ready(op())).await
    }
}

/// Composite failure for a retry session that never succeeded.
///
/// Carries the operation name, the configured timeout, and the last
/// attempt's error as [`source`](StdError::source). Callers catch this one
/// type at the retry boundary and introspect it for the underlying cause.
#[derive(Debug)]
pub struct RetryExhausted {
    operation: String,
    timeout: Option<Duration>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl RetryExhausted {
    /// Name of the operation that was retried.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// The deadline the session was configured with, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The most recent failure raised by the operation.
    ///
    /// `None` only when the deadline admitted no attempt at all.
    pub fn last_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl fmt::Display for RetryExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation '{}' did not complete", self.operation)?;
        if let Some(timeout) = self.timeout {
            write!(f, " within {timeout:?}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for RetryExhausted {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn StdError + 'static))
    }
}

/// Walk a failure's source chain looking for a [`StillPending`] signal.
fn find_pending<'a, E>(err: &'a E) -> Option<&'a StillPending>
where
    E: StdError + 'static,
{
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(inner) = current {
        if let Some(pending) = inner.downcast_ref::<StillPending>() {
            return Some(pending);
        }
        current = inner.source();
    }
    None
}
